//! Common test utilities.

#![allow(dead_code)]

use tablestate_rs::{Config, FetchParams, TableResource, TableState, TableStateBuilder};

/// A call made against the resource, in order.
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Fetch(FetchParams),
    Reset,
}

/// Resource that records every call instead of fetching.
#[derive(Debug, Default)]
pub struct RecordingResource {
    pub calls: Vec<Call>,
}

impl RecordingResource {
    pub fn fetches(&self) -> Vec<&FetchParams> {
        self.calls
            .iter()
            .filter_map(|call| match call {
                Call::Fetch(params) => Some(params),
                Call::Reset => None,
            })
            .collect()
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches().len()
    }

    pub fn reset_count(&self) -> usize {
        self.calls.iter().filter(|call| **call == Call::Reset).count()
    }

    pub fn last_fetch(&self) -> Option<&FetchParams> {
        self.calls.iter().rev().find_map(|call| match call {
            Call::Fetch(params) => Some(params),
            Call::Reset => None,
        })
    }

    pub fn clear(&mut self) {
        self.calls.clear();
    }
}

impl TableResource for RecordingResource {
    fn fetch(&mut self, params: &FetchParams) {
        self.calls.push(Call::Fetch(params.clone()));
    }

    fn reset(&mut self) {
        self.calls.push(Call::Reset);
    }
}

/// A table with every feature on and a venue selected.
pub fn table(total: u64, page_size: u32) -> TableState<RecordingResource> {
    TableStateBuilder::new()
        .total(total)
        .page_size(page_size)
        .selection("venue-1")
        .build(RecordingResource::default())
        .unwrap()
}

/// A table built from an explicit configuration.
pub fn table_with(config: Config) -> TableState<RecordingResource> {
    TableState::new(config, RecordingResource::default()).unwrap()
}
