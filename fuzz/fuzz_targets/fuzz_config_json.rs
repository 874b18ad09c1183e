//! Fuzz target: `PipelineConfig::from_json`
//!
//! Arbitrary text must either parse or be rejected; a parsed config that
//! passes validation must build a working stage.
//!
//! cargo fuzz run fuzz_config_json

#![no_main]

use libfuzzer_sys::fuzz_target;
use synapsys::config::PipelineConfig;
use synapsys::pipeline::{ProcessingStage, Stage};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = core::str::from_utf8(data) else {
        return;
    };
    let Ok(config) = PipelineConfig::from_json(text) else {
        return;
    };
    if config.validate().is_ok() {
        let mut stage = Stage::from_config(&config.stage);
        let _ = stage.consume(&[]);
    }
});
