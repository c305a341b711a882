use liblinkage::prelude::*;

use crate::api::{AppState, config::Config};


pub(crate) fn state(config: Config) -> AppState {
  AppState {
    linker: Linker::new(config.linkage_config().unwrap()).build().unwrap(),
    config,
    prometheus: None,
  }
}
