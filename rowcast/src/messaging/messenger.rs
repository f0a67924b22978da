use std::ops::{Deref, DerefMut};

use serde_json::Value as JsonValue;

use super::{validation, Message, MessageCode, MessagingConfig, Scope, ScopeData, Severity};

/// Append-only message log bound to a current location scope.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Messenger {
    scope: Scope,
    scope_data: ScopeData,
    messages: Vec<Message>,
    config: MessagingConfig,
}

impl Messenger {
    /// A sheet-scoped messenger with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: MessagingConfig) -> Self {
        Self {
            config,
            ..Self::default()
        }
    }

    pub fn scope(&self) -> Scope {
        self.scope
    }

    pub fn scope_data(&self) -> &ScopeData {
        &self.scope_data
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn into_messages(self) -> Vec<Message> {
        self.messages
    }

    pub fn config(&self) -> MessagingConfig {
        self.config
    }

    pub fn has_errors(&self) -> bool {
        self.messages.iter().any(Message::is_error)
    }

    /// Same scope and configuration, empty message list.
    pub fn duplicate(&self) -> Self {
        Self {
            scope: self.scope,
            scope_data: self.scope_data.clone(),
            messages: Vec::new(),
            config: self.config,
        }
    }

    /// Appends the messages of another messenger, keeping their order.
    pub fn extend(&mut self, messages: impl IntoIterator<Item = Message>) {
        self.messages.extend(messages);
    }

    // -------------------------------------------------------------------------
    // Permanent re-scoping
    // -------------------------------------------------------------------------

    pub fn rescope(&mut self, scope: Scope, scope_data: ScopeData) -> &mut Self {
        self.scope = scope;
        self.scope_data = scope_data;
        self
    }

    pub fn rescope_row(&mut self, row: usize) -> &mut Self {
        let (scope, data) = self.narrow_row(row);
        self.rescope(scope, data)
    }

    pub fn rescope_col(&mut self, col: impl Into<String>) -> &mut Self {
        let (scope, data) = self.narrow_col(col.into());
        self.rescope(scope, data)
    }

    // -------------------------------------------------------------------------
    // Block re-scoping
    // -------------------------------------------------------------------------

    /// Runs `f` with the given scope installed.
    ///
    /// The previous scope is restored when `f` returns, and also when it
    /// unwinds.
    pub fn scoping<R, F>(&mut self, scope: Scope, scope_data: ScopeData, f: F) -> R
    where
        F: FnOnce(&mut Messenger) -> R,
    {
        let mut guard = ScopeGuard::new(self, scope, scope_data);
        f(&mut *guard)
    }

    pub fn scope_row<R, F>(&mut self, row: usize, f: F) -> R
    where
        F: FnOnce(&mut Messenger) -> R,
    {
        let (scope, data) = self.narrow_row(row);
        self.scoping(scope, data, f)
    }

    pub fn scope_col<R, F>(&mut self, col: impl Into<String>, f: F) -> R
    where
        F: FnOnce(&mut Messenger) -> R,
    {
        let (scope, data) = self.narrow_col(col.into());
        self.scoping(scope, data, f)
    }

    fn narrow_row(&self, row: usize) -> (Scope, ScopeData) {
        let scope = match self.scope {
            Scope::Col | Scope::Cell => Scope::Cell,
            Scope::Sheet | Scope::Row => Scope::Row,
        };
        let data = ScopeData {
            row: Some(row),
            col: self.scope_data.col.clone(),
        };
        (scope, data)
    }

    fn narrow_col(&self, col: String) -> (Scope, ScopeData) {
        let scope = match self.scope {
            Scope::Row | Scope::Cell => Scope::Cell,
            Scope::Sheet | Scope::Col => Scope::Col,
        };
        let data = ScopeData {
            row: self.scope_data.row,
            col: Some(col),
        };
        (scope, data)
    }

    // -------------------------------------------------------------------------
    // Diagnostics
    // -------------------------------------------------------------------------

    pub fn warn(&mut self, code: impl Into<MessageCode>, data: Option<JsonValue>) -> &mut Self {
        self.add(Severity::Warn, code.into(), data)
    }

    pub fn error(&mut self, code: impl Into<MessageCode>, data: Option<JsonValue>) -> &mut Self {
        self.add(Severity::Error, code.into(), data)
    }

    fn add(&mut self, severity: Severity, code: MessageCode, data: Option<JsonValue>) -> &mut Self {
        let message = Message {
            code,
            code_data: data,
            scope: self.scope,
            scope_data: self.scope_data.clone(),
            severity,
        };

        if self.config.validate_messages {
            if let Err(err) = validation::validate(&message) {
                panic!("{}", err);
            }
        }

        self.messages.push(message);
        self
    }
}

/// Restores a messenger's previous scope when dropped.
///
/// Returned implicitly by [`Messenger::scoping`]; exposed for callers that
/// need a scope to outlive a single closure.
pub struct ScopeGuard<'a> {
    messenger: &'a mut Messenger,
    prev_scope: Scope,
    prev_scope_data: ScopeData,
}

impl<'a> ScopeGuard<'a> {
    pub fn new(messenger: &'a mut Messenger, scope: Scope, scope_data: ScopeData) -> Self {
        let prev_scope = std::mem::replace(&mut messenger.scope, scope);
        let prev_scope_data = std::mem::replace(&mut messenger.scope_data, scope_data);
        Self {
            messenger,
            prev_scope,
            prev_scope_data,
        }
    }
}

impl Deref for ScopeGuard<'_> {
    type Target = Messenger;

    fn deref(&self) -> &Messenger {
        self.messenger
    }
}

impl DerefMut for ScopeGuard<'_> {
    fn deref_mut(&mut self) -> &mut Messenger {
        self.messenger
    }
}

impl Drop for ScopeGuard<'_> {
    fn drop(&mut self) {
        self.messenger.scope = self.prev_scope;
        self.messenger.scope_data = std::mem::take(&mut self.prev_scope_data);
    }
}
