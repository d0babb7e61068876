//! Migration progress events and event handling

use crate::migration::types::{MigrationResult, TransactionStatus};

/// Events that can occur during a migration run
#[derive(Debug, Clone, PartialEq)]
pub enum MigrationEvent {
    Started { total: usize },
    ItemBegun { app_id: String, account: String },
    ItemStatus { app_id: String, account: String, status: TransactionStatus },
    ItemCompleted { app_id: String, account: String, success: bool, message: Option<String> },
    ItemSkipped { app_id: String, account: String, reason: String },
    Warning { message: String },
    Error { message: String },
    Completed { result: MigrationResult },
}

/// Event handler for migration events
pub trait MigrationEventHandler {
    fn handle_event(&self, event: MigrationEvent);
}

/// Composite event handler that forwards events to multiple handlers
pub struct CompositeEventHandler {
    handlers: Vec<Box<dyn MigrationEventHandler>>,
}

impl Default for CompositeEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl CompositeEventHandler {
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    pub fn add_handler<H: MigrationEventHandler + 'static>(&mut self, handler: H) {
        self.handlers.push(Box::new(handler));
    }
}

impl MigrationEventHandler for CompositeEventHandler {
    fn handle_event(&self, event: MigrationEvent) {
        for handler in &self.handlers {
            handler.handle_event(event.clone());
        }
    }
}

/// Simple logging event handler
pub struct LoggingEventHandler;

impl MigrationEventHandler for LoggingEventHandler {
    fn handle_event(&self, event: MigrationEvent) {
        use crate::{console_debug, console_error, console_info, console_warn};

        match event {
            MigrationEvent::Started { total } => {
                console_info!("[Event] 🚀 Migration started for {} accounts", total);
            }
            MigrationEvent::ItemBegun { app_id, account } => {
                console_info!("[Event] 📋 Migrating {} on {}", account, app_id);
            }
            MigrationEvent::ItemStatus { app_id, account, status } => {
                console_debug!("[Event] {} on {}: {}", account, app_id, status.label());
            }
            MigrationEvent::ItemCompleted {
                app_id,
                account,
                success,
                message,
            } => {
                if success {
                    console_info!("[Event] ✅ {} on {} migrated", account, app_id);
                } else {
                    console_warn!(
                        "[Event] ❌ {} on {} failed: {}",
                        account,
                        app_id,
                        message.unwrap_or_default()
                    );
                }
            }
            MigrationEvent::ItemSkipped { app_id, account, reason } => {
                console_debug!("[Event] Skipped {} on {}: {}", account, app_id, reason);
            }
            MigrationEvent::Warning { message } => {
                console_warn!("[Event] ⚠️ Warning: {}", message);
            }
            MigrationEvent::Error { message } => {
                console_error!("[Event] ❌ Error: {}", message);
            }
            MigrationEvent::Completed { result } => {
                if result.fails == 0 {
                    console_info!("[Event] 🎉 Migration completed: {} succeeded", result.success);
                } else {
                    console_error!(
                        "[Event] Migration finished with {} failures ({} succeeded)",
                        result.fails,
                        result.success
                    );
                }
            }
        }
    }
}
