//! Markdown blocks as egui layout jobs.

use egui::text::LayoutJob;
use egui::{FontId, TextFormat};
use lexi_core::markdown::{Block, Span};
use crate::theme::Palette;

const BODY_SIZE: f32 = 14.0;
const CODE_SIZE: f32 = 13.0;

/// One paragraph's spans as a single wrapped layout job
pub fn layout_job(spans: &[Span], palette: &Palette, wrap_width: f32) -> LayoutJob {
    let mut job = LayoutJob::default();
    job.wrap.max_width = wrap_width;
    for span in spans {
        job.append(span.text(), 0.0, span_format(span, palette));
    }
    job
}

pub fn span_format(span: &Span, palette: &Palette) -> TextFormat {
    let body = TextFormat {
        font_id: FontId::proportional(BODY_SIZE),
        color: palette.text_primary,
        ..Default::default()
    };
    match span {
        Span::Text(_) => body,
        Span::Bold(_) => TextFormat {
            color: palette.accent,
            ..body
        },
        Span::Italic(_) => TextFormat {
            italics: true,
            ..body
        },
        Span::Code(_) => TextFormat {
            font_id: FontId::monospace(CODE_SIZE),
            background: palette.code_bg,
            ..body
        },
    }
}

pub fn show_blocks(ui: &mut egui::Ui, blocks: &[Block], palette: &Palette) {
    for block in blocks {
        match block {
            Block::Break => ui.add_space(BODY_SIZE * 0.6),
            Block::Paragraph(spans) => {
                let job = layout_job(spans, palette, ui.available_width());
                ui.label(job);
            }
        }
    }
}
