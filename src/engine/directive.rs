// Directive bit-set and the typed completion reply it is derived from

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use crate::engine::candidate::Candidate;

/// Bit-set telling the shell how to present completion candidates
///
/// This is the wire representation, serialized as a decimal integer on the
/// trailing sentinel line and interpreted by the generated shell scripts.
/// Inside the engine replies are modeled as [`CompletionReply`], which
/// cannot express invalid bit combinations; the mask only exists at the
/// serialization boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Directive(u32);

impl Directive {
    /// Ordinary completion; the shell may offer filename completion alongside
    pub const DEFAULT: Directive = Directive(0);
    /// The completion function failed; the shell must suppress all completion
    pub const ERROR: Directive = Directive(1 << 0);
    /// No trailing space after an accepted candidate
    pub const NO_SPACE: Directive = Directive(1 << 1);
    /// No filename-completion fallback when candidates run out
    pub const NO_FILE_COMP: Directive = Directive(1 << 2);
    /// Candidates are file extensions restricting filename completion
    pub const FILTER_FILE_EXT: Directive = Directive(1 << 3);
    /// Candidates are a base directory restricting directory completion
    pub const FILTER_DIRS: Directive = Directive(1 << 4);

    /// Raw bit value, as written after the sentinel character
    pub fn bits(self) -> u32 {
        self.0
    }

    /// Whether every bit of `other` is set in `self`
    pub fn contains(self, other: Directive) -> bool {
        self.0 & other.0 == other.0
    }
}

impl BitOr for Directive {
    type Output = Directive;

    fn bitor(self, rhs: Directive) -> Directive {
        Directive(self.0 | rhs.0)
    }
}

impl BitOrAssign for Directive {
    fn bitor_assign(&mut self, rhs: Directive) {
        self.0 |= rhs.0;
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 == 0 {
            return write!(f, "Default");
        }
        let mut names = Vec::new();
        if self.contains(Directive::ERROR) {
            names.push("Error");
        }
        if self.contains(Directive::NO_SPACE) {
            names.push("NoSpace");
        }
        if self.contains(Directive::NO_FILE_COMP) {
            names.push("NoFileComp");
        }
        if self.contains(Directive::FILTER_FILE_EXT) {
            names.push("FilterFileExt");
        }
        if self.contains(Directive::FILTER_DIRS) {
            names.push("FilterDirs");
        }
        write!(f, "{}", names.join("|"))
    }
}

/// Typed outcome of a completion invocation
///
/// Candidates are either literal values, a file-extension set, or a
/// directory filter, never a mix; a failed invocation carries no
/// candidates at all. Modeling the reply this way pushes those invariants
/// into the type instead of leaving them as a bitmask convention.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionReply {
    /// Literal candidate values, with presentation tweaks
    Candidates {
        items: Vec<Candidate>,
        no_space: bool,
        no_file_fallback: bool,
    },
    /// File-extension filter (extensions without the leading dot)
    FileExtensions(Vec<String>),
    /// Directory filter under the given base, or the current directory
    Directories(Option<String>),
    /// The completion function could not do its job
    Failed,
}

impl CompletionReply {
    /// Literal candidates with default presentation
    pub fn candidates(items: Vec<Candidate>) -> Self {
        CompletionReply::Candidates {
            items,
            no_space: false,
            no_file_fallback: false,
        }
    }

    /// Empty literal reply with default presentation
    pub fn empty() -> Self {
        Self::candidates(Vec::new())
    }

    /// Suppress the trailing space; only meaningful on literal candidates
    pub fn no_space(mut self) -> Self {
        if let CompletionReply::Candidates { no_space, .. } = &mut self {
            *no_space = true;
        }
        self
    }

    /// Suppress filename-completion fallback; only meaningful on literal candidates
    pub fn no_file_fallback(mut self) -> Self {
        if let CompletionReply::Candidates { no_file_fallback, .. } = &mut self {
            *no_file_fallback = true;
        }
        self
    }

    /// Wire directive for this reply
    pub fn directive(&self) -> Directive {
        match self {
            CompletionReply::Candidates {
                no_space,
                no_file_fallback,
                ..
            } => {
                let mut directive = Directive::DEFAULT;
                if *no_space {
                    directive |= Directive::NO_SPACE;
                }
                if *no_file_fallback {
                    directive |= Directive::NO_FILE_COMP;
                }
                directive
            }
            CompletionReply::FileExtensions(_) => Directive::FILTER_FILE_EXT,
            CompletionReply::Directories(_) => Directive::FILTER_DIRS,
            CompletionReply::Failed => Directive::ERROR,
        }
    }
}
