#[path = "assembly/common.rs"]
mod common;
#[path = "assembly/consistency.rs"]
mod consistency;
#[path = "assembly/emission.rs"]
mod emission;
#[path = "assembly/pipeline.rs"]
mod pipeline;
#[path = "assembly/scenarios.rs"]
mod scenarios;
