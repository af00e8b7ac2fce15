// In-memory backend: canned protocols and statistics, records every trend request

use std::collections::HashMap;
use std::sync::Mutex;

use crate::error::BackendError;
use crate::models::{
    ElementRef, HistogramTrendRequest, HistogramTrendResponse, ProtocolDefinition, TrendStatistics,
};

use super::TrendBackend;

#[derive(Debug, Clone)]
enum TrendReply {
    Map(HashMap<String, TrendStatistics>),
    NoMap,
    Fail(String),
}

/// Backend fed programmatically. Replies are fixed at construction; only the request log mutates.
#[derive(Debug)]
pub struct MemoryBackend {
    protocols: HashMap<ElementRef, ProtocolDefinition>,
    reply: TrendReply,
    requests: Mutex<Vec<HistogramTrendRequest>>,
}

impl Default for MemoryBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self {
            protocols: HashMap::new(),
            reply: TrendReply::Map(HashMap::new()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub fn with_protocol(mut self, element: ElementRef, protocol: ProtocolDefinition) -> Self {
        self.protocols.insert(element, protocol);
        self
    }

    /// Adds `stats` under `key` (e.g. "100/" or "100/A1") in the returned statistics map.
    pub fn with_statistics(mut self, key: impl Into<String>, stats: TrendStatistics) -> Self {
        if let TrendReply::Map(map) = &mut self.reply {
            map.insert(key.into(), stats);
        } else {
            self.reply = TrendReply::Map(HashMap::from([(key.into(), stats)]));
        }
        self
    }

    /// Trend responses carry no statistics map at all.
    pub fn without_statistics_map(mut self) -> Self {
        self.reply = TrendReply::NoMap;
        self
    }

    /// Trend requests fail with a transport error.
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.reply = TrendReply::Fail(message.into());
        self
    }

    /// Trend requests received so far, oldest first.
    pub fn requests(&self) -> Vec<HistogramTrendRequest> {
        match self.requests.lock() {
            Ok(r) => r.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl TrendBackend for MemoryBackend {
    async fn element_protocol(
        &self,
        element: ElementRef,
    ) -> Result<Option<ProtocolDefinition>, BackendError> {
        Ok(self.protocols.get(&element).cloned())
    }

    async fn histogram_trend(
        &self,
        request: &HistogramTrendRequest,
    ) -> Result<HistogramTrendResponse, BackendError> {
        match self.requests.lock() {
            Ok(mut r) => r.push(request.clone()),
            Err(poisoned) => poisoned.into_inner().push(request.clone()),
        }
        match &self.reply {
            TrendReply::Map(map) => Ok(HistogramTrendResponse {
                trend_statistics: Some(map.clone()),
            }),
            TrendReply::NoMap => Ok(HistogramTrendResponse {
                trend_statistics: None,
            }),
            TrendReply::Fail(message) => Err(BackendError::Unavailable(message.clone())),
        }
    }
}
