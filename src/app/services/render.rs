//! Render capability.
//!
//! Text is highlighted in-process with syntect. Images pass their data
//! reference through with the zoom scale. PDF and Word rendering belongs to
//! the host, which plugs its engines into [`RenderRegistry`]; a kind with no
//! engine fails with a render error that leaves the document open.

use syntect::easy::HighlightLines;
use syntect::highlighting::{FontStyle, ThemeSet};
use syntect::parsing::{SyntaxReference, SyntaxSet};
use syntect::util::LinesWithEndings;

use super::classify::file_extension;
use super::text_ops::expand_tabs;
use crate::app::domain::document::{Document, DocumentContent, DocumentKind};
use crate::app::domain::settings::{ViewerSettings, Zoom};
use crate::app::infrastructure::error::{AppError, Result};

const DARK_THEME: &str = "base16-ocean.dark";
const LIGHT_THEME: &str = "base16-ocean.light";

/// Everything a renderer needs besides the document itself.
#[derive(Debug, Clone, Copy)]
pub struct RenderContext<'a> {
    pub settings: &'a ViewerSettings,
    pub zoom: Zoom,
    pub dark: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct StyledSpan {
    pub text: String,
    pub color: Rgb,
    pub bold: bool,
    pub italic: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RenderedLine {
    /// Present when line numbers are shown.
    pub number: Option<usize>,
    pub spans: Vec<StyledSpan>,
}

impl RenderedLine {
    pub fn plain(&self) -> String {
        self.spans.iter().map(|s| s.text.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum RenderOutput {
    Highlighted {
        syntax: String,
        lines: Vec<RenderedLine>,
        background: Option<Rgb>,
        font_size: f32,
        word_wrap: bool,
    },
    Image {
        data_url: String,
        scale_percent: u32,
    },
    /// Host-produced markup (e.g. converted Word HTML or PDF page markup).
    Markup(String),
}

pub trait Renderer {
    fn render(&self, doc: &Document, ctx: &RenderContext<'_>) -> Result<RenderOutput>;
}

fn render_error(doc: &Document, message: impl Into<String>) -> AppError {
    AppError::Render {
        id: doc.id(),
        message: message.into(),
    }
}

pub struct SyntaxRenderer {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl SyntaxRenderer {
    pub fn new() -> Self {
        Self {
            syntax_set: SyntaxSet::load_defaults_newlines(),
            theme_set: ThemeSet::load_defaults(),
        }
    }

    /// Extension first, then the language token, then plain text.
    fn find_syntax(&self, doc: &Document) -> &SyntaxReference {
        file_extension(doc.name())
            .and_then(|ext| self.syntax_set.find_syntax_by_extension(&ext))
            .or_else(|| self.syntax_set.find_syntax_by_token(doc.language()))
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text())
    }

    pub fn syntax_name(&self, doc: &Document) -> &str {
        &self.find_syntax(doc).name
    }
}

impl Default for SyntaxRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl Renderer for SyntaxRenderer {
    fn render(&self, doc: &Document, ctx: &RenderContext<'_>) -> Result<RenderOutput> {
        let text = doc
            .plain_text()
            .ok_or_else(|| render_error(doc, "document has no text content"))?;
        let theme_key = if ctx.dark { DARK_THEME } else { LIGHT_THEME };
        let theme = self
            .theme_set
            .themes
            .get(theme_key)
            .ok_or_else(|| render_error(doc, format!("theme {theme_key} is not available")))?;
        let syntax = self.find_syntax(doc);

        let mut highlighter = HighlightLines::new(syntax, theme);
        let mut lines = Vec::new();
        for (i, line) in LinesWithEndings::from(text).enumerate() {
            let ranges = highlighter
                .highlight_line(line, &self.syntax_set)
                .map_err(|e| render_error(doc, e.to_string()))?;
            let spans = ranges
                .into_iter()
                .filter_map(|(style, piece)| {
                    let piece = piece.trim_end_matches(['\n', '\r']);
                    if piece.is_empty() {
                        return None;
                    }
                    Some(StyledSpan {
                        text: expand_tabs(piece, ctx.settings.tab_width),
                        color: Rgb(style.foreground.r, style.foreground.g, style.foreground.b),
                        bold: style.font_style.contains(FontStyle::BOLD),
                        italic: style.font_style.contains(FontStyle::ITALIC),
                    })
                })
                .collect();
            lines.push(RenderedLine {
                number: ctx.settings.show_line_numbers.then_some(i + 1),
                spans,
            });
        }

        Ok(RenderOutput::Highlighted {
            syntax: syntax.name.clone(),
            lines,
            background: theme.settings.background.map(|c| Rgb(c.r, c.g, c.b)),
            font_size: ctx.zoom.scale(ctx.settings.font_size_pt),
            word_wrap: ctx.settings.word_wrap,
        })
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct ImageRenderer;

impl Renderer for ImageRenderer {
    fn render(&self, doc: &Document, ctx: &RenderContext<'_>) -> Result<RenderOutput> {
        match doc.content() {
            DocumentContent::Encoded(url) => Ok(RenderOutput::Image {
                data_url: url.clone(),
                scale_percent: ctx.zoom.percent(),
            }),
            DocumentContent::Text(_) | DocumentContent::Binary(_) => {
                Err(render_error(doc, "image has no data reference"))
            }
        }
    }
}

/// Picks the renderer for a document's kind.
pub struct RenderRegistry {
    text: SyntaxRenderer,
    image: ImageRenderer,
    pdf: Option<Box<dyn Renderer>>,
    word: Option<Box<dyn Renderer>>,
}

impl RenderRegistry {
    pub fn new() -> Self {
        Self {
            text: SyntaxRenderer::new(),
            image: ImageRenderer,
            pdf: None,
            word: None,
        }
    }

    pub fn with_pdf(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.pdf = Some(renderer);
        self
    }

    pub fn with_word(mut self, renderer: Box<dyn Renderer>) -> Self {
        self.word = Some(renderer);
        self
    }

    pub fn text(&self) -> &SyntaxRenderer {
        &self.text
    }

    pub fn render(&self, doc: &Document, ctx: &RenderContext<'_>) -> Result<RenderOutput> {
        match doc.kind() {
            DocumentKind::Text => self.text.render(doc, ctx),
            DocumentKind::Image => self.image.render(doc, ctx),
            DocumentKind::Pdf => match &self.pdf {
                Some(renderer) => renderer.render(doc, ctx),
                None => Err(render_error(doc, "no PDF renderer installed")),
            },
            DocumentKind::Word => match &self.word {
                Some(renderer) => renderer.render(doc, ctx),
                None => Err(render_error(doc, "no Word renderer installed")),
            },
        }
    }
}

impl Default for RenderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
