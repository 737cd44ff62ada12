#![forbid(unsafe_code)]

//! Language variants of an inline annotation.

/// Which language the inline text is in.
///
/// The tooltip always carries the other language: Arabic words are glossed
/// in Indonesian and Indonesian words show their Arabic original.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Variant {
    #[default]
    Arabic,
    Indonesian,
}

impl Variant {
    /// Class on the interactive anchor.
    #[must_use]
    pub const fn anchor_class(self) -> &'static str {
        match self {
            Self::Arabic => "arabicWord",
            Self::Indonesian => "interactiveText",
        }
    }

    /// Class on the plain span of a non-interactive instance, if any.
    #[must_use]
    pub const fn static_class(self) -> Option<&'static str> {
        match self {
            Self::Arabic => Some("arabicTextOnly"),
            Self::Indonesian => None,
        }
    }

    /// BCP 47 language tag.
    #[must_use]
    pub const fn lang(self) -> &'static str {
        match self {
            Self::Arabic => "ar",
            Self::Indonesian => "id",
        }
    }

    /// Text direction.
    #[must_use]
    pub const fn dir(self) -> &'static str {
        match self {
            Self::Arabic => "rtl",
            Self::Indonesian => "ltr",
        }
    }

    /// Language of the tooltip text.
    #[must_use]
    pub const fn counterpart(self) -> Self {
        match self {
            Self::Arabic => Self::Indonesian,
            Self::Indonesian => Self::Arabic,
        }
    }
}
