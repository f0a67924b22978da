//! Whole-document orchestration.
//!
//! ```text
//! SheetSource ──► BackendRegistry ──► Sheet
//!                                      │ headers()
//!                                      ▼
//!                           Headers::resolve ──► Vec<Header>
//!                                      │ rows()
//!                                      ▼
//!                           RowProcessor::call ──► RowResult (per row)
//! ```
//!
//! Failures local to a row never stop the run. Backend failures and header
//! failures do: no further row is read.

use std::sync::Arc;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::error::{ProcessResult, SheetError};
use crate::headers::{Header, Headers};
use crate::messaging::{Message, MessageCode, Messenger, MessagingConfig};
use crate::outcome::Outcome;
use crate::row_processor::{RowProcessor, RowResult};
use crate::sheet::{BackendRegistry, Sheet, SheetSource};
use crate::specification::Specification;

/// Outcome of a whole document.
///
/// `messages` holds the sheet and header messages only. Row messages are
/// handed out with each [`RowResult`] and never retained here.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SheetResult {
    pub result: Outcome<()>,
    pub messages: Vec<Message>,
}

impl SheetResult {
    pub fn is_success(&self) -> bool {
        self.result.is_success()
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }
}

/// Processes documents against one specification.
#[derive(Debug, Clone)]
pub struct SheetProcessor {
    specification: Arc<Specification>,
    registry: BackendRegistry,
    messaging: MessagingConfig,
}

impl SheetProcessor {
    pub fn new(specification: impl Into<Arc<Specification>>) -> Self {
        Self {
            specification: specification.into(),
            registry: BackendRegistry::default(),
            messaging: MessagingConfig::default(),
        }
    }

    pub fn with_registry(mut self, registry: BackendRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_messaging(mut self, messaging: MessagingConfig) -> Self {
        self.messaging = messaging;
        self
    }

    pub fn specification(&self) -> &Specification {
        &self.specification
    }

    /// Opens `source` with the first matching backend and processes it,
    /// handing every row result to `on_row` as soon as it is ready.
    pub fn call<F>(&self, source: SheetSource, on_row: F) -> ProcessResult<SheetResult>
    where
        F: FnMut(RowResult),
    {
        let mut messenger = Messenger::with_config(self.messaging);

        let Some(backend) = self.registry.get(&source) else {
            warn!(backends = ?self.registry.names(), "no backend matches the source");
            messenger.error(MessageCode::NoApplicableBackend, None);
            return Ok(finish(Outcome::empty_failure(), messenger));
        };

        let mut sheet = match backend.open(source) {
            Ok(sheet) => sheet,
            Err(err) => {
                sheet_error(&err, &mut messenger);
                return Ok(finish(Outcome::empty_failure(), messenger));
            }
        };

        self.run(sheet.as_mut(), messenger, on_row)
    }

    /// Processes an already opened sheet.
    pub fn call_sheet<F>(&self, sheet: &mut dyn Sheet, on_row: F) -> ProcessResult<SheetResult>
    where
        F: FnMut(RowResult),
    {
        self.run(sheet, Messenger::with_config(self.messaging), on_row)
    }

    fn run<F>(
        &self,
        sheet: &mut dyn Sheet,
        mut messenger: Messenger,
        on_row: F,
    ) -> ProcessResult<SheetResult>
    where
        F: FnMut(RowResult),
    {
        let outcome = self.process(sheet, &mut messenger, on_row);

        if let Err(err) = sheet.close() {
            sheet_error(&err, &mut messenger);
            return outcome.map(|_| finish(Outcome::empty_failure(), messenger));
        }

        let outcome = outcome?;
        Ok(finish(outcome, messenger))
    }

    fn process<F>(
        &self,
        sheet: &mut dyn Sheet,
        messenger: &mut Messenger,
        mut on_row: F,
    ) -> ProcessResult<Outcome<()>>
    where
        F: FnMut(RowResult),
    {
        let actual = match sheet.headers() {
            Ok(actual) => actual,
            Err(err) => {
                sheet_error(&err, messenger);
                return Ok(Outcome::empty_failure());
            }
        };

        let headers: Vec<Header> = match Headers::resolve(&self.specification, actual, messenger) {
            Outcome::Success(headers) => headers.unwrap_or_default(),
            Outcome::Failure(_) => {
                warn!(messages = messenger.messages().len(), "header resolution failed");
                return Ok(Outcome::empty_failure());
            }
        };

        // Rows work on duplicates; their messages leave with each RowResult.
        let template = messenger.duplicate();
        let processor = RowProcessor::new(&headers, &template);
        let mut count = 0usize;

        for row in sheet.rows() {
            let row = match row {
                Ok(row) => row,
                Err(err) => {
                    sheet_error(&err, messenger);
                    return Ok(Outcome::empty_failure());
                }
            };

            on_row(processor.call(row)?);
            count += 1;
        }

        debug!(rows = count, "rows processed");
        Ok(Outcome::empty_success())
    }
}

fn sheet_error(err: &SheetError, messenger: &mut Messenger) {
    warn!(error = %err, "backend failure");
    messenger.error(err.msg_code(), None);
}

fn finish(result: Outcome<()>, messenger: Messenger) -> SheetResult {
    let messages = messenger.into_messages();
    info!(
        success = result.is_success(),
        messages = messages.len(),
        errors = messages.iter().filter(|m| m.is_error()).count(),
        "sheet processed"
    );
    SheetResult { result, messages }
}
