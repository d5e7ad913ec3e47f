//! Local placeholder images.
//!
//! Two renderings, both 512x512 SVG documents returned as `data:` URIs:
//! a plain demo card used when no inference key is configured, and a themed
//! gradient card used when the inference call fails. Only the colors are
//! random; layout and text are fixed.

use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::Rng;

pub const IMAGE_SIZE: u32 = 512;

/// Prompt characters shown on the themed card before truncation.
const CAPTION_CHARS: usize = 40;

const DEMO_COLORS: [&str; 5] = ["#FF6B6B", "#4ECDC4", "#45B7D1", "#96CEB4", "#FFEAA7"];

/// Color theme for the fallback card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Theme {
    Blue,
    Green,
    Red,
    Purple,
    Orange,
    Pink,
    Yellow,
}

impl Theme {
    pub fn palette(self) -> &'static [&'static str; 4] {
        match self {
            Theme::Blue => &["#1E3A8A", "#3B82F6", "#60A5FA", "#93C5FD"],
            Theme::Green => &["#166534", "#22C55E", "#4ADE80", "#86EFAC"],
            Theme::Red => &["#991B1B", "#EF4444", "#F87171", "#FCA5A5"],
            Theme::Purple => &["#581C87", "#A855F7", "#C084FC", "#DDD6FE"],
            Theme::Orange => &["#9A3412", "#F97316", "#FB923C", "#FED7AA"],
            Theme::Pink => &["#BE185D", "#EC4899", "#F472B6", "#FBCFE8"],
            Theme::Yellow => &["#A16207", "#EAB308", "#FDE047", "#FEF3C7"],
        }
    }
}

/// Keyword table, checked in order. The first theme with a keyword contained
/// in the lowercased prompt wins, so "sunset" is red (before orange's "sun")
/// and "sunshine" is orange (before yellow's "sunshine").
const THEME_KEYWORDS: [(Theme, &[&str]); 6] = [
    (Theme::Green, &["green", "nature", "forest", "plant"]),
    (Theme::Red, &["red", "fire", "sunset", "rose"]),
    (Theme::Purple, &["purple", "magic", "fantasy", "mystical"]),
    (Theme::Orange, &["orange", "warm", "sun", "autumn"]),
    (Theme::Pink, &["pink", "flower", "cherry", "blossom"]),
    (Theme::Yellow, &["yellow", "gold", "sunshine", "bright"]),
];

/// Pick the fallback theme for a prompt. Defaults to blue.
pub fn select_theme(prompt: &str) -> Theme {
    let prompt = prompt.to_lowercase();
    THEME_KEYWORDS
        .iter()
        .find(|(_, keywords)| keywords.iter().any(|k| prompt.contains(k)))
        .map(|(theme, _)| *theme)
        .unwrap_or(Theme::Blue)
}

/// Quoted prompt excerpt for the themed card.
pub fn caption(prompt: &str) -> String {
    let mut chars = prompt.chars();
    let head: String = chars.by_ref().take(CAPTION_CHARS).collect();
    let ellipsis = if chars.next().is_some() { "..." } else { "" };
    format!("\"{}{}\"", head, ellipsis)
}

/// Demo card: solid background and an explanatory caption.
pub fn demo_image() -> String {
    demo_image_with(&mut rand::thread_rng())
}

pub fn demo_image_with<R: Rng + ?Sized>(rng: &mut R) -> String {
    let background = DEMO_COLORS[rng.gen_range(0..DEMO_COLORS.len())];

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            r#"<rect width="{size}" height="{size}" fill="{bg}"/>"#,
            r#"<g fill="white" font-family="Arial" text-anchor="middle">"#,
            r#"<text x="256" y="256" font-size="24">AI Image Placeholder</text>"#,
            r#"<text x="256" y="290" font-size="16">Set HUGGINGFACE_API_KEY</text>"#,
            r#"<text x="256" y="310" font-size="16">for real AI generation</text>"#,
            r#"</g></svg>"#,
        ),
        size = IMAGE_SIZE,
        bg = background,
    );

    svg_data_uri(&svg)
}

/// Fallback card: themed gradient, prompt excerpt and decorative rings.
pub fn themed_image(prompt: &str) -> String {
    themed_image_with(prompt, &mut rand::thread_rng())
}

pub fn themed_image_with<R: Rng + ?Sized>(prompt: &str, rng: &mut R) -> String {
    let palette = select_theme(prompt).palette();
    let start = palette[rng.gen_range(0..palette.len())];
    let end = palette[rng.gen_range(0..palette.len())];

    let svg = format!(
        concat!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#,
            r#"<defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1">"#,
            r#"<stop offset="0" stop-color="{start}"/><stop offset="1" stop-color="{end}"/>"#,
            r#"</linearGradient></defs>"#,
            r#"<rect width="{size}" height="{size}" fill="url(#bg)"/>"#,
            r#"<g font-family="Arial" text-anchor="middle">"#,
            r#"<text x="256" y="200" font-size="18" font-weight="bold" fill="rgba(255,255,255,0.8)">AI Generated Image</text>"#,
            r#"<text x="256" y="230" font-size="14" fill="rgba(255,255,255,0.9)">{caption}</text>"#,
            r#"<text x="256" y="280" font-size="12" fill="rgba(255,255,255,0.7)">Powered by Hugging Face AI</text>"#,
            r#"</g>"#,
            r#"<g fill="none" stroke="rgba(255,255,255,0.3)" stroke-width="2">"#,
            r#"<circle cx="256" cy="350" r="50"/><circle cx="256" cy="350" r="30"/>"#,
            r#"</g></svg>"#,
        ),
        size = IMAGE_SIZE,
        start = start,
        end = end,
        caption = escape_xml(&caption(prompt)),
    );

    svg_data_uri(&svg)
}

fn svg_data_uri(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", BASE64.encode(svg))
}

fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}
