use std::{fmt::Display, ops::Range};

/// Half-open byte range into the formula source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SrcSpan {
    pub start: u32,
    pub end: u32,
}

impl SrcSpan {
	pub fn from(start: u32, end: u32) -> Self {
		Self { start, end }
	}

	pub fn empty(at: u32) -> Self {
		Self { start: at, end: at }
	}

	/// Smallest span covering both `self` and `other`.
	pub fn merge(&self, other: SrcSpan) -> Self {
		Self {
			start: self.start.min(other.start),
			end: self.end.max(other.end),
		}
	}

	pub fn len(&self) -> u32 {
		self.end.saturating_sub(self.start)
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	pub fn range(&self) -> Range<usize> {
		(self.start as usize)..(self.end as usize)
	}
}

impl Display for SrcSpan {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		write!(f, "{}..{}", self.start, self.end)
	}
}
