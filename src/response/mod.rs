// 动态响应模块

mod backend;
mod functions;
mod generator;

pub use backend::{
    PnrStatus, ReservationBackend, RunningStatus, SeatAvailability, SimulatedBackend,
    TrainSchedule, TrainSummary,
};
pub use functions::{DynamicFunction, UnknownFunction};
pub use generator::ResponseGenerator;
