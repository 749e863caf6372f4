use async_trait::async_trait;
use carebot::errors::ChatError;
use carebot::prompts::PromptPayload;
use carebot::providers::ai::ChatProvider;
use std::collections::VecDeque;
use std::fmt::Debug;
use std::sync::{Arc, Mutex};

// --- Mock Chat Provider ---

/// A scripted `ChatProvider`.
///
/// Replies are handed out in the order they were queued. Once the queue is
/// empty every call fails with a 503, which exercises the fallback path.
#[derive(Clone, Debug, Default)]
pub struct MockChatProvider {
    replies: Arc<Mutex<VecDeque<Result<String, ChatError>>>>,
    calls: Arc<Mutex<Vec<PromptPayload>>>,
}

impl MockChatProvider {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful reply.
    pub fn push_reply(&self, reply: &str) -> &Self {
        self.replies
            .lock()
            .unwrap()
            .push_back(Ok(reply.to_string()));
        self
    }

    /// Queues a failure.
    pub fn push_error(&self, error: ChatError) -> &Self {
        self.replies.lock().unwrap().push_back(Err(error));
        self
    }

    /// Retrieves the recorded payloads for assertion.
    pub fn get_calls(&self) -> Vec<PromptPayload> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatProvider for MockChatProvider {
    async fn complete(&self, payload: &PromptPayload) -> Result<String, ChatError> {
        self.calls.lock().unwrap().push(payload.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(ChatError::Api {
                    status: 503,
                    body: "MockChatProvider: no reply queued".to_string(),
                })
            })
    }
}

// --- Test-Specific Helpers ---
#[cfg(feature = "pdf")]
pub mod helpers {
    use anyhow::Result;
    use printpdf::{
        BuiltinFont, Layer, Mm, Op, PdfDocument, PdfPage, PdfSaveOptions, Pt, TextItem,
        TextMatrix, TextRenderingMode,
    };

    /// Generates a single-page PDF with `text` drawn in built-in Helvetica, so the
    /// text is stored as plain single-byte strings a parser can read back.
    pub fn generate_test_pdf(text: &str) -> Result<Vec<u8>> {
        generate_multiline_test_pdf(&[text])
    }

    /// Like [`generate_test_pdf`], but places each of `lines` on its own
    /// baseline with a text matrix, the way most PDF writers lay out lines.
    pub fn generate_multiline_test_pdf(lines: &[&str]) -> Result<Vec<u8>> {
        let mut doc = PdfDocument::new("Test PDF");
        let mut page = PdfPage::new(Mm(210.0), Mm(297.0), vec![]);
        let layer_id = doc.add_layer(&Layer::new("Layer 1"));

        let mut ops = vec![
            Op::BeginLayer {
                layer_id: layer_id.clone(),
            },
            Op::StartTextSection,
            Op::SetFontSizeBuiltinFont {
                size: Pt(12.0),
                font: BuiltinFont::Helvetica,
            },
            Op::SetTextRenderingMode {
                mode: TextRenderingMode::Fill,
            },
        ];
        for (i, line) in lines.iter().enumerate() {
            ops.push(Op::SetTextMatrix {
                matrix: TextMatrix::Translate(Mm(10.0).into(), Mm(280.0 - 10.0 * i as f32).into()),
            });
            ops.push(Op::WriteTextBuiltinFont {
                items: vec![TextItem::Text(line.to_string())],
                font: BuiltinFont::Helvetica,
            });
        }
        ops.push(Op::EndTextSection);
        ops.push(Op::EndLayer { layer_id });
        page.ops = ops;
        doc.pages.push(page);

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if !warnings.is_empty() {
            eprintln!("PDF generation warnings: {warnings:?}");
        }
        Ok(bytes)
    }
}
