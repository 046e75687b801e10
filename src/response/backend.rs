use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};
use serde::Serialize;

/// 运行状态
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum RunningStatus {
    OnTime,
    LateTenMinutes,
    LateThirtyMinutes,
    DelayedOneHour,
}

/// 时刻表
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrainSchedule {
    pub departure: String,
    pub arrival: String,
    pub duration: String,
}

/// PNR 查询结果
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PnrStatus {
    pub status: String,
    pub berth: String,
    pub coach: String,
}

/// 余票情况
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SeatAvailability {
    pub available: u32,
    pub waiting: u32,
}

/// 两站间车次摘要
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TrainSummary {
    pub number: String,
    pub name: String,
    pub departure: String,
    pub arrival: String,
    pub duration: String,
}

/// 订票后端
///
/// 动态响应所需的全部业务数据都经由该 trait 获取，便于替换为真实预订系统
pub trait ReservationBackend: Send + Sync {
    fn running_status(&self, train_number: &str) -> RunningStatus;
    fn schedule(&self, train_number: &str) -> TrainSchedule;
    /// 订票并返回 10 位 PNR
    fn book(&self, train_number: &str, train_class: &str) -> u64;
    /// 退票并返回退款金额（卢比）
    fn cancel(&self, pnr: &str) -> u32;
    fn pnr_status(&self, pnr: &str, train_class: &str) -> PnrStatus;
    fn seat_availability(&self, train_number: &str, train_class: &str, date: &str)
        -> SeatAvailability;
    fn fare(&self, train_number: &str, train_class: &str) -> u32;
    fn trains_between(&self, source: &str, destination: &str) -> Vec<TrainSummary>;
}

const PNR_STATUSES: [&str; 4] = [
    "Confirmed",
    "Waiting List (WL)",
    "Reservation Against Cancellation (RAC)",
    "Cancelled",
];

const BERTHS: [&str; 5] = [
    "Lower Berth",
    "Middle Berth",
    "Upper Berth",
    "Side Lower",
    "Side Upper",
];

const KNOWN_TRAINS: [(&str, &str, &str, &str, &str); 4] = [
    ("12718", "Express", "8:45 AM", "5:30 PM", "8h 45m"),
    ("17018", "Superfast", "6:00 AM", "2:15 PM", "8h 15m"),
    ("12009", "Shatabdi", "7:30 AM", "1:45 PM", "6h 15m"),
    ("12345", "Rajdhani", "10:00 AM", "6:30 PM", "8h 30m"),
];

const DEFAULT_FARE: u32 = 500;

/// 模拟后端：随机状态、票价、余票，以及按车次的固定时刻表
pub struct SimulatedBackend {
    rng: Mutex<StdRng>,
}

impl SimulatedBackend {
    pub fn new(rng: StdRng) -> Self {
        Self {
            rng: Mutex::new(rng),
        }
    }

    /// 固定种子，便于测试与回放
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }

    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_entropy())
    }
}

impl ReservationBackend for SimulatedBackend {
    fn running_status(&self, _train_number: &str) -> RunningStatus {
        let statuses = [
            RunningStatus::OnTime,
            RunningStatus::LateTenMinutes,
            RunningStatus::LateThirtyMinutes,
            RunningStatus::DelayedOneHour,
        ];
        let mut rng = self.rng.lock();
        *statuses.choose(&mut *rng).unwrap_or(&RunningStatus::OnTime)
    }

    fn schedule(&self, train_number: &str) -> TrainSchedule {
        let (departure, arrival, duration) = match train_number {
            "12718" => ("8:45 AM", "5:30 PM", "8 hours 45 minutes"),
            "17018" => ("6:00 AM", "2:15 PM", "8 hours 15 minutes"),
            "12009" => ("7:30 AM", "1:45 PM", "6 hours 15 minutes"),
            _ => ("8:00 AM", "6:00 PM", "10 hours"),
        };
        TrainSchedule {
            departure: departure.to_string(),
            arrival: arrival.to_string(),
            duration: duration.to_string(),
        }
    }

    fn book(&self, _train_number: &str, _train_class: &str) -> u64 {
        self.rng.lock().gen_range(1_000_000_000..=9_999_999_999)
    }

    fn cancel(&self, _pnr: &str) -> u32 {
        self.rng.lock().gen_range(500..=2000)
    }

    fn pnr_status(&self, _pnr: &str, train_class: &str) -> PnrStatus {
        let mut rng = self.rng.lock();
        let status = PNR_STATUSES.choose(&mut *rng).copied().unwrap_or("Confirmed");
        let berth = BERTHS.choose(&mut *rng).copied().unwrap_or("Lower Berth");
        let coach = if train_class.contains("Sleeper") {
            format!("S{}", rng.gen_range(1..=15))
        } else {
            format!("A{}", rng.gen_range(1..=10))
        };
        PnrStatus {
            status: status.to_string(),
            berth: berth.to_string(),
            coach,
        }
    }

    fn seat_availability(
        &self,
        _train_number: &str,
        _train_class: &str,
        _date: &str,
    ) -> SeatAvailability {
        let mut rng = self.rng.lock();
        SeatAvailability {
            available: rng.gen_range(5..=50),
            waiting: rng.gen_range(0..=20),
        }
    }

    fn fare(&self, _train_number: &str, train_class: &str) -> u32 {
        let range = match train_class {
            "Sleeper" => 300..=800,
            "AC 3 Tier" => 800..=1500,
            "AC 2 Tier" => 1500..=2500,
            "First AC" => 3000..=5000,
            _ => return DEFAULT_FARE,
        };
        self.rng.lock().gen_range(range)
    }

    fn trains_between(&self, _source: &str, _destination: &str) -> Vec<TrainSummary> {
        let mut rng = self.rng.lock();
        KNOWN_TRAINS
            .choose_multiple(&mut *rng, 3)
            .map(|(number, name, departure, arrival, duration)| TrainSummary {
                number: number.to_string(),
                name: name.to_string(),
                departure: departure.to_string(),
                arrival: arrival.to_string(),
                duration: duration.to_string(),
            })
            .collect()
    }
}
