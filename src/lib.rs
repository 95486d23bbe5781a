pub mod config;
pub mod error;
pub mod read;

pub use config::ReaderConfig;
pub use error::{Error, Result};
pub use read::BvhReader;

use cgmath::{Vector3, Zero};

use std::fmt;
use std::ops::Range;

/// Name given to every `End Site` leaf.
pub const END_SITE: &str = "End Site";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    Xposition,
    Yposition,
    Zposition,
    Xrotation,
    Yrotation,
    Zrotation,
}

impl Channel {
    pub const ALL: [Channel; 6] = [
        Channel::Xposition,
        Channel::Yposition,
        Channel::Zposition,
        Channel::Xrotation,
        Channel::Yrotation,
        Channel::Zrotation,
    ];

    /// Looks up a channel by its exact, case-sensitive spelling in a `CHANNELS` line.
    pub fn from_name(name: &str) -> Option<Self> {
        use Channel::*;
        match name {
            "Xposition" => Some(Xposition),
            "Yposition" => Some(Yposition),
            "Zposition" => Some(Zposition),
            "Xrotation" => Some(Xrotation),
            "Yrotation" => Some(Yrotation),
            "Zrotation" => Some(Zrotation),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        use Channel::*;
        match self {
            Xposition => "Xposition",
            Yposition => "Yposition",
            Zposition => "Zposition",
            Xrotation => "Xrotation",
            Yrotation => "Yrotation",
            Zrotation => "Zrotation",
        }
    }

    pub fn is_position(self) -> bool {
        use Channel::*;
        matches!(self, Xposition | Yposition | Zposition)
    }

    pub fn is_rotation(self) -> bool {
        !self.is_position()
    }
}

impl fmt::Display for Channel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One joint (or `End Site`) of the skeleton.
///
/// `channels` lists the columns this segment contributes to every frame, in
/// declaration order. Children are owned and kept in declaration order.
#[derive(Debug, Clone, PartialEq)]
pub struct Segment {
    pub name: String,
    pub offset: Vector3<f64>,
    pub channels: Vec<Channel>,
    pub children: Vec<Segment>,
}

impl Segment {
    pub fn new<S: Into<String>>(name: S) -> Self {
        Self {
            name: name.into(),
            offset: Vector3::zero(),
            channels: vec![],
            children: vec![],
        }
    }

    pub fn end_site() -> Self {
        Self::new(END_SITE)
    }

    pub fn is_end_site(&self) -> bool {
        self.name == END_SITE
    }

    /// Pre-order walk over this segment and all of its descendants.
    pub fn iter(&self) -> PreOrder<'_> {
        PreOrder { stack: vec![self] }
    }

    /// Number of channels declared in this subtree.
    pub fn channel_count(&self) -> usize {
        self.iter().map(|s| s.channels.len()).sum()
    }

    pub fn find(&self, name: &str) -> Option<&Segment> {
        self.iter().find(|s| s.name == name)
    }
}

impl<'a> IntoIterator for &'a Segment {
    type Item = &'a Segment;
    type IntoIter = PreOrder<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

pub struct PreOrder<'a> {
    stack: Vec<&'a Segment>,
}

impl<'a> Iterator for PreOrder<'a> {
    type Item = &'a Segment;

    fn next(&mut self) -> Option<Self::Item> {
        let seg = self.stack.pop()?;
        self.stack.extend(seg.children.iter().rev());
        Some(seg)
    }
}

/// Pairs every segment of the forest, in pre-order, with the frame columns it owns.
///
/// Segments without channels get an empty range at their position.
pub fn channel_ranges(roots: &[Segment]) -> Vec<(&Segment, Range<usize>)> {
    let mut start = 0;
    roots
        .iter()
        .flat_map(Segment::iter)
        .map(|seg| {
            let end = start + seg.channels.len();
            let range = start..end;
            start = end;
            (seg, range)
        })
        .collect()
}

/// The numeric half of a BVH file: one row per frame, one column per channel.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Motion {
    pub frame_count: usize,
    pub frame_time: f64,
    pub frames: Vec<Vec<f64>>,
}

impl Motion {
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&[f64]> {
        self.frames.get(index).map(Vec::as_slice)
    }

    pub fn value(&self, frame: usize, column: usize) -> Option<f64> {
        self.frame(frame).and_then(|f| f.get(column)).copied()
    }

    /// Samples of one channel column across all frames.
    pub fn column(&self, column: usize) -> impl Iterator<Item = f64> + '_ {
        self.frames.iter().filter_map(move |f| f.get(column).copied())
    }

    /// Length in seconds of the frames actually read.
    pub fn duration(&self) -> f64 {
        self.frames.len() as f64 * self.frame_time
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn arm() -> Segment {
        let mut hand = Segment::new("Hand");
        hand.channels = vec![Channel::Zrotation, Channel::Xrotation];
        hand.children.push(Segment::end_site());

        let mut root = Segment::new("Hips");
        root.channels = vec![Channel::Xposition, Channel::Yposition, Channel::Zposition];
        root.children.push(hand);
        root.children.push(Segment::new("Leg"));
        root
    }

    #[test]
    fn channel_names() {
        for c in Channel::ALL.iter() {
            assert_eq!(Channel::from_name(c.name()), Some(*c));
            assert_eq!(c.to_string(), c.name());
        }
        assert_eq!(Channel::from_name("xposition"), None);
        assert_eq!(Channel::from_name("Foo"), None);
        assert!(Channel::Yposition.is_position());
        assert!(Channel::Yrotation.is_rotation());
    }

    #[test]
    fn pre_order() {
        let root = arm();
        let names: Vec<&str> = root.iter().map(|s| &s.name[..]).collect();
        assert_eq!(names, ["Hips", "Hand", END_SITE, "Leg"]);
        assert_eq!(root.channel_count(), 5);
        assert!(root.find(END_SITE).unwrap().is_end_site());
        assert!(root.find("Spine").is_none());
    }

    #[test]
    fn ranges() {
        let roots = vec![arm(), arm()];
        let ranges: Vec<_> = channel_ranges(&roots)
            .into_iter()
            .map(|(s, r)| (&s.name[..], r))
            .collect();
        assert_eq!(ranges[0], ("Hips", 0..3));
        assert_eq!(ranges[1], ("Hand", 3..5));
        assert_eq!(ranges[2], (END_SITE, 5..5));
        assert_eq!(ranges[4], ("Hips", 5..8));
        assert_eq!(ranges.last().unwrap().1, 10..10);
    }

    #[test]
    fn motion_accessors() {
        let motion = Motion {
            frame_count: 2,
            frame_time: 0.5,
            frames: vec![vec![1., 2.], vec![3., 4.]],
        };
        assert_eq!(motion.frame(1), Some(&[3., 4.][..]));
        assert_eq!(motion.value(0, 1), Some(2.));
        assert_eq!(motion.value(2, 0), None);
        assert_eq!(motion.column(1).collect::<Vec<_>>(), [2., 4.]);
        assert_eq!(motion.duration(), 1.0);
        assert!(Motion::default().is_empty());
    }
}
