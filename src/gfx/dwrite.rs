//! DirectWrite 文本格式

use tracing::debug;
use windows::{core::PCWSTR, Win32::Graphics::DirectWrite::*};

use super::ApiResultExt;
use crate::core::config::{ParagraphAlignment, TextAlignment};
use crate::core::error::Result;
use crate::renderer::text::TextStyle;

impl From<TextAlignment> for DWRITE_TEXT_ALIGNMENT {
    fn from(alignment: TextAlignment) -> Self {
        match alignment {
            TextAlignment::Leading => DWRITE_TEXT_ALIGNMENT_LEADING,
            TextAlignment::Trailing => DWRITE_TEXT_ALIGNMENT_TRAILING,
            TextAlignment::Center => DWRITE_TEXT_ALIGNMENT_CENTER,
            TextAlignment::Justified => DWRITE_TEXT_ALIGNMENT_JUSTIFIED,
        }
    }
}

impl From<ParagraphAlignment> for DWRITE_PARAGRAPH_ALIGNMENT {
    fn from(alignment: ParagraphAlignment) -> Self {
        match alignment {
            ParagraphAlignment::Near => DWRITE_PARAGRAPH_ALIGNMENT_NEAR,
            ParagraphAlignment::Far => DWRITE_PARAGRAPH_ALIGNMENT_FAR,
            ParagraphAlignment::Center => DWRITE_PARAGRAPH_ALIGNMENT_CENTER,
        }
    }
}

/// 共享的 DirectWrite 工厂以及绘制用的文本格式
pub struct TextFormat {
    pub factory: IDWriteFactory,
    pub format: IDWriteTextFormat,
}

impl TextFormat {
    pub fn new(style: &TextStyle) -> Result<Self> {
        unsafe {
            let factory: IDWriteFactory =
                DWriteCreateFactory(DWRITE_FACTORY_TYPE_SHARED).api("DWriteCreateFactory")?;

            let format = factory
                .CreateTextFormat(
                    PCWSTR(style.font_family.as_ptr()),
                    None,
                    DWRITE_FONT_WEIGHT_NORMAL,
                    DWRITE_FONT_STYLE_NORMAL,
                    DWRITE_FONT_STRETCH_NORMAL,
                    style.font_size,
                    PCWSTR(style.locale.as_ptr()),
                )
                .api("IDWriteFactory::CreateTextFormat")?;

            format
                .SetTextAlignment(style.alignment.into())
                .api("IDWriteTextFormat::SetTextAlignment")?;
            format
                .SetParagraphAlignment(style.paragraph_alignment.into())
                .api("IDWriteTextFormat::SetParagraphAlignment")?;

            debug!(font_size = style.font_size, "DirectWrite text format created");

            Ok(Self { factory, format })
        }
    }
}
