//! Message envelopes and receive matching.

/// Ordinal position of a participant in the world.
pub type Rank = usize;

/// Logical channel a message travels on.
pub type Tag = i32;

/// Which sender a receive or probe accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Any,
    Rank(Rank),
}

impl Source {
    pub fn accepts(&self, rank: Rank) -> bool {
        match self {
            Source::Any => true,
            Source::Rank(r) => *r == rank,
        }
    }
}

/// What a probe learned about the next matching message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Status {
    pub source: Rank,
    pub tag: Tag,
    /// Number of elements carried by the message: 1 for a signal or a
    /// scalar, the vector length for values.
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Payload {
    Signal(i32),
    Scalar(f64),
    Values(Vec<f64>),
}

impl Payload {
    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Payload::Signal(_) => "signal",
            Payload::Scalar(_) => "scalar",
            Payload::Values(_) => "values",
        }
    }

    pub(crate) fn count(&self) -> usize {
        match self {
            Payload::Signal(_) | Payload::Scalar(_) => 1,
            Payload::Values(values) => values.len(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct Envelope {
    pub source: Rank,
    pub tag: Tag,
    pub payload: Payload,
}

impl Envelope {
    pub(crate) fn matches(&self, source: Source, tag: Tag) -> bool {
        self.tag == tag && source.accepts(self.source)
    }

    pub(crate) fn status(&self) -> Status {
        Status {
            source: self.source,
            tag: self.tag,
            count: self.payload.count(),
        }
    }
}
