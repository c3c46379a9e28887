// Copyright 2021 Twitter, Inc.
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use ahash::AHashMap;
use fieldlog::Logger;
use parking_lot::RwLock;
use std::sync::{Arc, OnceLock};

static GLOBAL: OnceLock<Loggers> = OnceLock::new();

/// The process-wide logger registry used by `load`.
pub fn global() -> &'static Loggers {
    GLOBAL.get_or_init(Loggers::new)
}

/// Loggers stored by id.
#[derive(Default)]
pub struct Loggers {
    loggers: RwLock<AHashMap<String, Arc<Logger>>>,
}

impl Loggers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store a logger under `id`, returning the logger it replaces.
    pub fn save(&self, id: impl Into<String>, logger: Arc<Logger>) -> Option<Arc<Logger>> {
        self.loggers.write().insert(id.into(), logger)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Logger>> {
        self.loggers.read().get(id).cloned()
    }

    pub fn remove(&self, id: &str) -> Option<Arc<Logger>> {
        self.loggers.write().remove(id)
    }

    /// The stored ids in sorted order.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.loggers.read().keys().cloned().collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.loggers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.loggers.read().is_empty()
    }

    /// Close the sink of every stored logger, returning the first error. The
    /// loggers stay registered.
    pub fn close_all(&self) -> std::io::Result<()> {
        let loggers: Vec<Arc<Logger>> = self.loggers.read().values().cloned().collect();

        let mut result = Ok(());
        for logger in loggers {
            if let Err(e) = logger.close() {
                if result.is_ok() {
                    result = Err(e);
                }
            }
        }
        result
    }
}
