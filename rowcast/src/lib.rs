//! # Rowcast - row-by-row validation and typecasting of tabular documents
//!
//! Rowcast reads a spreadsheet-like document (CSV file, in-memory table) and
//! turns every row into a typed record described by a declarative template.
//! Problems found in the data never abort processing: they are collected as
//! scoped diagnostics (sheet, row, column or cell) next to each row's outcome.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────┐     ┌───────────────┐     ┌─────────────┐     ┌─────────────┐
//! │  Template   │────▶│ Specification │────▶│   Headers   │────▶│ RowProcessor│
//! │   (JSON)    │     │  (patterns)   │     │ (once/sheet)│     │  (per row)  │
//! └─────────────┘     └───────────────┘     └─────────────┘     └─────────────┘
//!                                                  ▲                   │
//!                     ┌───────────────┐            │                   ▼
//!                     │ Sheet backend │────────────┘            Outcome + Messages
//!                     │ (CSV, memory) │
//!                     └───────────────┘
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use rowcast::{SheetProcessor, SheetSource, Template, TemplateConfig};
//!
//! let template = Template::from_path("template.json").unwrap();
//! let specification = template.apply(&TemplateConfig::default()).unwrap();
//!
//! let processor = SheetProcessor::new(specification);
//! let result = processor
//!     .call(SheetSource::Path("input.csv".into()), |row| {
//!         println!("row {}: {:?}", row.row, row.result);
//!     })
//!     .unwrap();
//! println!("{} messages", result.messages.len());
//! ```
//!
//! ## Modules
//!
//! - [`error`] - Fatal error hierarchy
//! - [`outcome`] - Success/Failure outcomes with short-circuiting
//! - [`messaging`] - Scoped diagnostics
//! - [`types`] - Cast chains, scalar and composite types, type container
//! - [`sheet`] - Document backends
//! - [`template`] - Declarative templates
//! - [`logging`] - Log subscriber setup

// Core modules
pub mod error;
pub mod outcome;
pub mod value;

// Diagnostics
pub mod messaging;

// Types
pub mod types;
pub mod utils;

// Specification
pub mod column;
pub mod specification;
pub mod template;

// Processing
pub mod headers;
pub mod row_processor;
pub mod row_value_builder;
pub mod sheet_processor;

// Backends
pub mod sheet;

// Logging
pub mod logging;

// =============================================================================
// Re-exports - Error types
// =============================================================================

pub use error::{
    BackendResult,
    Error,
    MessageError,
    ProcessResult,
    SheetError,
    SpecError,
    SpecResult,
    TypeError,
    TypeResult,
};

// =============================================================================
// Re-exports - Core values
// =============================================================================

pub use outcome::{Escape, Outcome};
pub use value::Value;

// =============================================================================
// Re-exports - Messaging
// =============================================================================

pub use messaging::{
    Message,
    MessageCode,
    Messenger,
    MessagingConfig,
    Scope,
    ScopeData,
    Severity,
};

// =============================================================================
// Re-exports - Types
// =============================================================================

pub use types::{
    Cast,
    CastChain,
    CompositeType,
    ScalarType,
    Step,
    Type,
    TypeContainer,
};

// =============================================================================
// Re-exports - Specification
// =============================================================================

pub use column::{Column, HeaderPattern};
pub use specification::Specification;
pub use template::{Attribute, Template, TemplateConfig, TypeDecl};

// =============================================================================
// Re-exports - Processing
// =============================================================================

pub use headers::{Header, Headers};
pub use row_processor::{RowProcessor, RowResult};
pub use row_value_builder::{Record, RowValueBuilder};
pub use sheet_processor::{SheetProcessor, SheetResult};

// =============================================================================
// Re-exports - Backends
// =============================================================================

pub use sheet::{
    Backend,
    BackendRegistry,
    CsvOptions,
    CsvSheet,
    MemorySheet,
    Sheet,
    SheetSource,
};
