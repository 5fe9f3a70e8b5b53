//! Navigazione come capability iniettata: il session manager non conosce il router

use std::sync::Mutex;
use tracing::info;

pub trait Navigator: Send + Sync {
    fn navigate(&self, destination: &str);
}

/// Si limita a loggare la destinazione
#[derive(Debug, Default, Clone, Copy)]
pub struct LogNavigator;

impl Navigator for LogNavigator {
    fn navigate(&self, destination: &str) {
        info!(destination, "navigate");
    }
}

/// Registra le destinazioni in ordine
#[derive(Debug, Default)]
pub struct RecordingNavigator {
    visited: Mutex<Vec<String>>,
}

impl RecordingNavigator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn visited(&self) -> Vec<String> {
        self.visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    pub fn last(&self) -> Option<String> {
        self.visited().pop()
    }
}

impl Navigator for RecordingNavigator {
    fn navigate(&self, destination: &str) {
        self.visited
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(destination.to_string());
    }
}
