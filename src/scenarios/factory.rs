use anyhow::{anyhow, Result};
use std::rc::Rc;

use super::{burglary::BurglaryAlarm, sprinkler::Sprinkler, ScenarioMaker};

pub struct ScenarioMakerFactory;

impl ScenarioMakerFactory {
    pub const NAMES: [&'static str; 2] = ["burglary", "sprinkler"];

    pub fn new_shared(name: &str) -> Result<Rc<dyn ScenarioMaker>> {
        match name {
            "burglary" => Ok(Rc::new(BurglaryAlarm {})),
            "sprinkler" => Ok(Rc::new(Sprinkler {})),
            _ => Err(anyhow!(
                "Unknown scenario '{}', expected one of: {}",
                name,
                Self::NAMES.join(", ")
            )),
        }
    }
}
