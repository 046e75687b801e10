use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// 流程文件中可声明的动态响应函数
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DynamicFunction {
    TrainStatus,
    TrainSchedule,
    BookingConfirmation,
    CancellationConfirmation,
    ConnectAgent,
    PnrStatusResponse,
    SeatAvailabilityResponse,
    FareResponse,
    TrainsBetweenStationsResponse,
}

impl DynamicFunction {
    pub const ALL: [DynamicFunction; 9] = [
        DynamicFunction::TrainStatus,
        DynamicFunction::TrainSchedule,
        DynamicFunction::BookingConfirmation,
        DynamicFunction::CancellationConfirmation,
        DynamicFunction::ConnectAgent,
        DynamicFunction::PnrStatusResponse,
        DynamicFunction::SeatAvailabilityResponse,
        DynamicFunction::FareResponse,
        DynamicFunction::TrainsBetweenStationsResponse,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DynamicFunction::TrainStatus => "train_status",
            DynamicFunction::TrainSchedule => "train_schedule",
            DynamicFunction::BookingConfirmation => "booking_confirmation",
            DynamicFunction::CancellationConfirmation => "cancellation_confirmation",
            DynamicFunction::ConnectAgent => "connect_agent",
            DynamicFunction::PnrStatusResponse => "pnr_status_response",
            DynamicFunction::SeatAvailabilityResponse => "seat_availability_response",
            DynamicFunction::FareResponse => "fare_response",
            DynamicFunction::TrainsBetweenStationsResponse => "trains_between_stations_response",
        }
    }
}

impl fmt::Display for DynamicFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown dynamic response function `{0}`")]
pub struct UnknownFunction(pub String);

impl FromStr for DynamicFunction {
    type Err = UnknownFunction;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        DynamicFunction::ALL
            .into_iter()
            .find(|f| f.as_str() == s)
            .ok_or_else(|| UnknownFunction(s.to_string()))
    }
}
