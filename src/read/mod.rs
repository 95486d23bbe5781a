use log::*;

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::mem;
use std::path::Path;

use crate::config::ReaderConfig;
use crate::error::{Error, Result};
use crate::{Motion, Segment};

pub mod hierarchy;
pub mod lines;
pub mod motion;
pub mod tokens;

use hierarchy::HierarchyParser;
use lines::LineCursor;

enum Marker {
    Hierarchy,
    Motion,
}

fn marker(line: &str) -> Option<Marker> {
    match &tokens::tokenize(line)[..] {
        ["HIERARCHY"] => Some(Marker::Hierarchy),
        ["MOTION"] => Some(Marker::Motion),
        _ => None,
    }
}

/// One load attempt of a BVH file.
///
/// A hierarchy error fails the whole load. A broken `MOTION` block is only
/// logged and kept in [`motion_error`](Self::motion_error), unless
/// [`ReaderConfig::strict_motion`] is set. The load succeeds once at least one
/// root has been parsed.
#[derive(Debug, Default)]
pub struct BvhReader {
    config: ReaderConfig,
    roots: Vec<Segment>,
    channels: usize,
    motion: Motion,
    motion_error: Option<Error>,
    loaded: bool,
}

impl BvhReader {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ReaderConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &ReaderConfig {
        &self.config
    }

    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let file = File::open(path)?;
        debug!("loading {}", path.display());
        self.load(BufReader::new(file))
    }

    pub fn load_str(&mut self, data: &str) -> Result<()> {
        self.load(data.as_bytes())
    }

    pub fn load<R: BufRead>(&mut self, reader: R) -> Result<()> {
        if self.loaded {
            return Err(Error::AlreadyLoaded);
        }
        self.roots.clear();
        self.channels = 0;
        self.motion = Motion::default();
        self.motion_error = None;

        let mut cursor = LineCursor::new(reader);
        while let Some(line) = cursor.next_line()? {
            match marker(&line) {
                Some(Marker::Hierarchy) => {
                    let hierarchy = HierarchyParser::default().parse(&mut cursor)?;
                    self.roots.extend(hierarchy.roots);
                    self.channels += hierarchy.channels;
                }
                Some(Marker::Motion) => self.load_motion(&mut cursor)?,
                None => {}
            }
        }

        if self.roots.is_empty() {
            return Err(Error::NoHierarchy);
        }
        self.loaded = true;
        info!(
            "loaded {} root(s), {} channel(s), {} frame(s)",
            self.roots.len(),
            self.channels,
            self.motion.frames.len()
        );
        Ok(())
    }

    fn load_motion<R: BufRead>(&mut self, cursor: &mut LineCursor<R>) -> Result<()> {
        let res = motion::parse(cursor, self.channels, &mut self.motion, &self.config);
        match res {
            Ok(()) => Ok(()),
            Err(e @ Error::Io(_)) => Err(e),
            Err(e) if self.config.strict_motion => Err(e),
            Err(e) => {
                warn!("failed to load motion: {}", e);
                self.motion_error = Some(e);
                Ok(())
            }
        }
    }

    pub fn roots(&self) -> &[Segment] {
        &self.roots
    }

    /// Moves the forest out. Later calls return an empty `Vec`.
    pub fn take_roots(&mut self) -> Vec<Segment> {
        mem::take(&mut self.roots)
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn motion(&self) -> &Motion {
        &self.motion
    }

    pub fn frame_count(&self) -> usize {
        self.motion.frame_count
    }

    pub fn frame_time(&self) -> f64 {
        self.motion.frame_time
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded
    }

    /// The error that cut the `MOTION` block short, if the load tolerated one.
    pub fn motion_error(&self) -> Option<&Error> {
        self.motion_error.as_ref()
    }
}
