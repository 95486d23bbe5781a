use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid reader config: {0}")]
    Config(#[from] toml::de::Error),

    #[error("line {line}: ROOT declared inside an open block")]
    NestedRoot { line: usize },

    #[error("line {line}: {keyword} has no enclosing segment")]
    NoCurrentSegment { line: usize, keyword: &'static str },

    #[error("line {line}: {keyword} is missing a name")]
    MissingName { line: usize, keyword: &'static str },

    #[error("line {line}: End Site cannot have children")]
    EndSiteChild { line: usize },

    #[error("line {line}: End Site cannot declare channels")]
    EndSiteChannels { line: usize },

    #[error("line {line}: `{{` without a preceding ROOT, JOINT or End Site")]
    UnexpectedOpenBrace { line: usize },

    #[error("line {line}: expected `{{`, found {found:?}")]
    MissingOpenBrace { line: usize, found: String },

    #[error("line {line}: `}}` without an open block")]
    UnexpectedCloseBrace { line: usize },

    #[error("line {line}: {depth} block(s) still open")]
    Unterminated { line: usize, depth: usize },

    #[error("line {line}: segment already has an OFFSET")]
    DuplicateOffset { line: usize },

    #[error("line {line}: missing {field}")]
    MissingField { line: usize, field: &'static str },

    #[error("line {line}: invalid {field} {token:?}")]
    InvalidNumber {
        line: usize,
        field: &'static str,
        token: String,
    },

    #[error("line {line}: unknown channel {name:?}")]
    UnknownChannel { line: usize, name: String },

    #[error("line {line}: CHANNELS declares {declared} channel(s) but names {found}")]
    ChannelCountMismatch {
        line: usize,
        declared: usize,
        found: usize,
    },

    #[error("line {line}: {header} header needs at least {need} fields, found {found}")]
    MalformedHeader {
        line: usize,
        header: &'static str,
        need: usize,
        found: usize,
    },

    #[error("line {line}: missing {header} header")]
    MissingHeader { line: usize, header: &'static str },

    #[error("line {line}: frame has {found} value(s), expected {expected}")]
    RowWidth {
        line: usize,
        expected: usize,
        found: usize,
    },

    #[error("motion declares {declared} frame(s) but contains {found}")]
    FrameCountMismatch { declared: usize, found: usize },

    #[error("no HIERARCHY with at least one ROOT was found")]
    NoHierarchy,

    #[error("reader is already loaded")]
    AlreadyLoaded,
}

pub type Result<T> = std::result::Result<T, Error>;
