//! HTML rendering of attribution results.
//!
//! Produces a self-contained fragment: label summary, score table, and a
//! token heat strip where green marks tokens supporting the target label and
//! red marks tokens arguing against it. The fragment caps its own height and
//! scrolls, so embedding pages keep a stable layout.

use crate::types::InterpretationResult;

/// Fixed display height of the fragment in pixels.
const DISPLAY_HEIGHT_PX: u32 = 350;

/// Minimum background alpha so weak attributions stay visible.
const MIN_ALPHA: f32 = 0.05;

/// Render an interpretation as a self-contained HTML fragment.
pub fn render_html(result: &InterpretationResult) -> String {
    let mut html = String::with_capacity(2048);

    html.push_str(&format!(
        "<div class=\"prism-attribution\" style=\"font-family: sans-serif; \
         max-height: {DISPLAY_HEIGHT_PX}px; overflow-y: auto; padding: 8px;\">\n"
    ));

    html.push_str(&format!(
        "<p><strong>Predicted label:</strong> {} \
         &middot; <strong>Attribution target:</strong> {}</p>\n",
        escape_html(&result.predicted_label),
        escape_html(&result.attribution_target)
    ));

    html.push_str("<table style=\"border-collapse: collapse; margin-bottom: 8px;\">\n");
    html.push_str(
        "<tr><th style=\"text-align: left; padding-right: 12px;\">Label</th>\
         <th style=\"text-align: right;\">Score</th></tr>\n",
    );
    for score in &result.scores {
        html.push_str(&format!(
            "<tr><td style=\"padding-right: 12px;\">{}</td>\
             <td style=\"text-align: right;\">{:.3}</td></tr>\n",
            escape_html(&score.label),
            score.score
        ));
    }
    html.push_str("</table>\n");

    let max_abs = result
        .attributions
        .iter()
        .map(|a| a.score.abs())
        .fold(0.0f32, f32::max);

    html.push_str("<p style=\"line-height: 1.8;\">\n");
    for attribution in &result.attributions {
        html.push_str(&format!(
            "<mark style=\"background-color: {}; padding: 2px 3px; \
             border-radius: 3px; margin-right: 2px;\" title=\"{:.4}\">{}</mark>\n",
            background_color(attribution.score, max_abs),
            attribution.score,
            escape_html(&attribution.token)
        ));
    }
    html.push_str("</p>\n");

    html.push_str(
        "<p style=\"font-size: 0.85em; color: #57606a;\">\
         <mark style=\"background-color: rgba(46, 160, 67, 0.5);\">green</mark> \
         supports the target label, \
         <mark style=\"background-color: rgba(248, 81, 73, 0.5);\">red</mark> \
         argues against it.</p>\n",
    );

    html.push_str("</div>\n");
    html
}

/// CSS background for a signed attribution, scaled by the strip's maximum.
fn background_color(score: f32, max_abs: f32) -> String {
    if max_abs <= f32::EPSILON {
        return "transparent".to_string();
    }
    let alpha = (score.abs() / max_abs).clamp(MIN_ALPHA, 1.0);
    if score >= 0.0 {
        format!("rgba(46, 160, 67, {alpha:.3})")
    } else {
        format!("rgba(248, 81, 73, {alpha:.3})")
    }
}

/// Escape text for safe embedding in HTML.
pub fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
