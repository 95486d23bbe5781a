use cgmath::Vector3;
use log::*;

use std::io::BufRead;

use super::lines::LineCursor;
use super::tokens::{count, field, float, tokenize};
use crate::error::{Error, Result};
use crate::{Channel, Segment};

/// Roots and channel total of one `HIERARCHY` block.
#[derive(Debug, Default)]
pub struct Hierarchy {
    pub roots: Vec<Segment>,
    pub channels: usize,
}

struct Open {
    segment: Segment,
    has_offset: bool,
}

impl Open {
    fn new(segment: Segment) -> Self {
        Self {
            segment,
            has_offset: false,
        }
    }
}

enum Step {
    Next,
    Motion,
}

/// Stack machine turning nested `{ ... }` blocks into a forest.
///
/// Ancestors whose block is still open live on `stack`; the innermost open
/// segment is `current`. Closing a block moves `current` into its parent, or
/// into `roots` when the stack is empty.
#[derive(Default)]
pub struct HierarchyParser {
    stack: Vec<Open>,
    current: Option<Open>,
    just_opened: bool,
    channels: usize,
    roots: Vec<Segment>,
}

impl HierarchyParser {
    /// Consumes lines up to EOF or a `MOTION` marker, which is left unread.
    pub fn parse<R: BufRead>(mut self, cursor: &mut LineCursor<R>) -> Result<Hierarchy> {
        debug!("hierarchy starts after line {}", cursor.line_no());
        let mut last = cursor.line_no();
        while let Some(line) = cursor.next_line()? {
            last = cursor.line_no();
            if let Step::Motion = self.line(&tokenize(&line), last)? {
                cursor.unread(line);
                break;
            }
        }
        if self.current.is_some() {
            return Err(Error::Unterminated {
                line: last,
                depth: self.stack.len() + 1,
            });
        }
        debug!(
            "hierarchy done: {} root(s), {} channel(s)",
            self.roots.len(),
            self.channels
        );
        Ok(Hierarchy {
            roots: self.roots,
            channels: self.channels,
        })
    }

    fn line(&mut self, tokens: &[&str], line: usize) -> Result<Step> {
        let keyword = match tokens.first() {
            Some(k) => *k,
            None => return Ok(Step::Next),
        };
        if self.just_opened && keyword != "{" {
            return Err(Error::MissingOpenBrace {
                line,
                found: tokens.join(" "),
            });
        }
        match keyword {
            "ROOT" => self.root(tokens, line)?,
            "JOINT" => {
                let name = name(tokens, line, "JOINT")?;
                self.open_child(Segment::new(name), line, "JOINT")?
            }
            "End" => self.open_child(Segment::end_site(), line, "End Site")?,
            "{" => {
                if !self.just_opened {
                    return Err(Error::UnexpectedOpenBrace { line });
                }
                self.just_opened = false;
            }
            "OFFSET" => self.offset(tokens, line)?,
            "CHANNELS" => self.channels(tokens, line)?,
            "}" => self.close(line)?,
            "MOTION" if tokens.len() == 1 => return Ok(Step::Motion),
            _ => {}
        }
        Ok(Step::Next)
    }

    fn root(&mut self, tokens: &[&str], line: usize) -> Result<()> {
        if !self.stack.is_empty() || self.current.is_some() {
            return Err(Error::NestedRoot { line });
        }
        let name = name(tokens, line, "ROOT")?;
        trace!("line {}: ROOT {}", line, name);
        self.current = Some(Open::new(Segment::new(name)));
        self.just_opened = true;
        Ok(())
    }

    fn open_child(&mut self, segment: Segment, line: usize, keyword: &'static str) -> Result<()> {
        let parent = match self.current.take() {
            Some(p) => p,
            None => return Err(Error::NoCurrentSegment { line, keyword }),
        };
        if parent.segment.is_end_site() {
            self.current = Some(parent);
            return Err(Error::EndSiteChild { line });
        }
        trace!("line {}: {} {} under {}", line, keyword, segment.name, parent.segment.name);
        self.stack.push(parent);
        self.current = Some(Open::new(segment));
        self.just_opened = true;
        Ok(())
    }

    fn current_mut(&mut self, line: usize, keyword: &'static str) -> Result<&mut Open> {
        self.current
            .as_mut()
            .ok_or(Error::NoCurrentSegment { line, keyword })
    }

    fn offset(&mut self, tokens: &[&str], line: usize) -> Result<()> {
        let x = float(field(tokens, 1, line, "OFFSET x")?, line, "OFFSET x")?;
        let y = float(field(tokens, 2, line, "OFFSET y")?, line, "OFFSET y")?;
        let z = float(field(tokens, 3, line, "OFFSET z")?, line, "OFFSET z")?;
        let open = self.current_mut(line, "OFFSET")?;
        if open.has_offset {
            return Err(Error::DuplicateOffset { line });
        }
        open.segment.offset = Vector3::new(x, y, z);
        open.has_offset = true;
        Ok(())
    }

    fn channels(&mut self, tokens: &[&str], line: usize) -> Result<()> {
        let open = self.current_mut(line, "CHANNELS")?;
        if open.segment.is_end_site() {
            return Err(Error::EndSiteChannels { line });
        }
        let declared = count(field(tokens, 1, line, "channel count")?, line, "channel count")?;
        let channels = tokens[2..]
            .iter()
            .map(|&name| {
                Channel::from_name(name).ok_or_else(|| Error::UnknownChannel {
                    line,
                    name: name.to_owned(),
                })
            })
            .collect::<Result<Vec<_>>>()?;
        if channels.len() != declared {
            return Err(Error::ChannelCountMismatch {
                line,
                declared,
                found: channels.len(),
            });
        }
        open.segment.channels.extend(channels);
        self.channels += declared;
        Ok(())
    }

    fn close(&mut self, line: usize) -> Result<()> {
        let done = match self.current.take() {
            Some(open) => open.segment,
            None => return Err(Error::UnexpectedCloseBrace { line }),
        };
        match self.stack.pop() {
            Some(mut parent) => {
                parent.segment.children.push(done);
                self.current = Some(parent);
            }
            None => {
                debug!("line {}: closed root {}", line, done.name);
                self.roots.push(done);
            }
        }
        Ok(())
    }
}

/// Joins everything after the keyword, so names containing spaces survive.
fn name(tokens: &[&str], line: usize, keyword: &'static str) -> Result<String> {
    match tokens.get(1..) {
        Some(rest) if !rest.is_empty() => Ok(rest.join(" ")),
        _ => Err(Error::MissingName { line, keyword }),
    }
}
