use crate::constants::{
    BASE_URI, CHILD_SRC, CONNECT_SRC, DEFAULT_BUFFER_CAPACITY, DEFAULT_SRC, FONT_SRC,
    FORM_ACTION, FRAME_ANCESTORS, FRAME_SRC, IMG_SRC, MANIFEST_SRC, MEDIA_SRC, OBJECT_SRC,
    REPORT_URI, SCRIPT_SRC, STYLE_SRC,
};
use crate::error::CspError;
use indexmap::IndexMap;
use smallvec::SmallVec;
use std::{borrow::Cow, fmt, str::FromStr};

/// The closed set of directives a policy may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Directive {
    BaseUri,
    ChildSrc,
    ConnectSrc,
    DefaultSrc,
    FontSrc,
    FormAction,
    FrameAncestors,
    FrameSrc,
    ImgSrc,
    ManifestSrc,
    MediaSrc,
    ObjectSrc,
    ScriptSrc,
    StyleSrc,
    ReportUri,
}

impl Directive {
    pub const ALL: [Directive; 15] = [
        Directive::BaseUri,
        Directive::ChildSrc,
        Directive::ConnectSrc,
        Directive::DefaultSrc,
        Directive::FontSrc,
        Directive::FormAction,
        Directive::FrameAncestors,
        Directive::FrameSrc,
        Directive::ImgSrc,
        Directive::ManifestSrc,
        Directive::MediaSrc,
        Directive::ObjectSrc,
        Directive::ScriptSrc,
        Directive::StyleSrc,
        Directive::ReportUri,
    ];

    #[inline(always)]
    pub const fn name(&self) -> &'static str {
        match self {
            Directive::BaseUri => BASE_URI,
            Directive::ChildSrc => CHILD_SRC,
            Directive::ConnectSrc => CONNECT_SRC,
            Directive::DefaultSrc => DEFAULT_SRC,
            Directive::FontSrc => FONT_SRC,
            Directive::FormAction => FORM_ACTION,
            Directive::FrameAncestors => FRAME_ANCESTORS,
            Directive::FrameSrc => FRAME_SRC,
            Directive::ImgSrc => IMG_SRC,
            Directive::ManifestSrc => MANIFEST_SRC,
            Directive::MediaSrc => MEDIA_SRC,
            Directive::ObjectSrc => OBJECT_SRC,
            Directive::ScriptSrc => SCRIPT_SRC,
            Directive::StyleSrc => STYLE_SRC,
            Directive::ReportUri => REPORT_URI,
        }
    }
}

impl fmt::Display for Directive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Directive {
    type Err = CspError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Directive::ALL
            .iter()
            .copied()
            .find(|directive| directive.name() == s)
            .ok_or_else(|| CspError::InvalidDirective(s.to_string()))
    }
}

impl TryFrom<&str> for Directive {
    type Error = CspError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        s.parse()
    }
}

type Expressions = SmallVec<[Cow<'static, str>; 4]>;

/// Directive name -> ordered, duplicate-free source expressions.
///
/// Directives keep the position of their first insertion, even across a
/// [`reset`](DirectiveTable::reset).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DirectiveTable {
    directives: IndexMap<Directive, Expressions>,
}

impl DirectiveTable {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends `expression`; blank expressions and exact duplicates are ignored.
    pub fn add(&mut self, directive: Directive, expression: impl Into<Cow<'static, str>>) {
        let expression = expression.into();
        if expression.trim().is_empty() {
            return;
        }

        let expressions = self.directives.entry(directive).or_default();
        if !expressions.iter().any(|existing| *existing == expression) {
            expressions.push(expression);
        }
    }

    pub fn reset(&mut self, directive: Directive) {
        if let Some(expressions) = self.directives.get_mut(&directive) {
            expressions.clear();
        }
    }

    #[inline]
    pub fn get(&self, directive: Directive) -> &[Cow<'static, str>] {
        self.directives
            .get(&directive)
            .map(|expressions| expressions.as_slice())
            .unwrap_or_default()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.directives.values().all(|expressions| expressions.is_empty())
    }

    /// Directives that currently carry at least one expression, in first-added order.
    pub fn directives(&self) -> impl Iterator<Item = Directive> + '_ {
        self.directives
            .iter()
            .filter(|(_, expressions)| !expressions.is_empty())
            .map(|(directive, _)| *directive)
    }

    fn estimated_size(&self) -> usize {
        self.directives
            .iter()
            .map(|(directive, expressions)| {
                directive.name().len()
                    + 2
                    + expressions.iter().map(|e| e.len() + 1).sum::<usize>()
            })
            .sum()
    }

    /// `"<directive> <expr> ...;"` per non-empty directive, joined by a single space.
    pub fn serialize(&self) -> String {
        let mut buffer = String::with_capacity(self.estimated_size().max(DEFAULT_BUFFER_CAPACITY));

        for (directive, expressions) in &self.directives {
            if expressions.is_empty() {
                continue;
            }
            if !buffer.is_empty() {
                buffer.push(' ');
            }
            buffer.push_str(directive.name());
            for expression in expressions {
                buffer.push(' ');
                buffer.push_str(expression);
            }
            buffer.push(';');
        }

        buffer
    }
}
