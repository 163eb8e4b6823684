#![no_main]

use libfuzzer_sys::fuzz_target;

use oracle_scenario::{Scenario, ScenarioSpec};

fuzz_target!(|data: &[u8]| {
    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };
    let Ok(spec) = ScenarioSpec::from_json_str(text) else {
        return;
    };

    // Reference resolution must reject bad positions with an error.
    if let Ok(scenario) = Scenario::load(&spec, 0) {
        let _ = scenario.final_height();
        let _ = scenario.checkpoint_block();
    }
});
