use std::sync::Arc;

use super::backend::{ReservationBackend, RunningStatus, SimulatedBackend};
use super::functions::DynamicFunction;
use crate::flow::constants::{fields, prompt};
use crate::state::Session;

const DEFAULT_STATUS_TRAIN: &str = "12718";
const DEFAULT_SCHEDULE_TRAIN: &str = "17018";
const DEFAULT_CLASS: &str = "Sleeper";

/// 动态响应生成器
///
/// 按函数名分发到固定的处理函数，业务数据来自可替换的后端
#[derive(Clone)]
pub struct ResponseGenerator {
    backend: Arc<dyn ReservationBackend>,
}

impl Default for ResponseGenerator {
    fn default() -> Self {
        Self::new(Arc::new(SimulatedBackend::from_entropy()))
    }
}

impl ResponseGenerator {
    pub fn new(backend: Arc<dyn ReservationBackend>) -> Self {
        Self { backend }
    }

    /// 按流程文件中的函数名生成响应，未知函数返回通用等待提示
    pub fn generate_by_name(&self, function: &str, session: &Session, input: &str) -> String {
        match function.parse::<DynamicFunction>() {
            Ok(function) => self.generate(function, session, input),
            Err(err) => {
                tracing::warn!(error = %err, "falling back to generic response");
                prompt::PROCESSING.to_string()
            }
        }
    }

    pub fn generate(&self, function: DynamicFunction, session: &Session, input: &str) -> String {
        tracing::debug!(function = %function, "generating dynamic response");
        match function {
            DynamicFunction::TrainStatus => self.train_status(session, input),
            DynamicFunction::TrainSchedule => self.train_schedule(session, input),
            DynamicFunction::BookingConfirmation => self.booking_confirmation(session),
            DynamicFunction::CancellationConfirmation => self.cancellation(session, input),
            DynamicFunction::ConnectAgent => "I'm connecting you to one of our customer support agents. Please hold for just a moment, and someone will be with you shortly.".to_string(),
            DynamicFunction::PnrStatusResponse => self.pnr_status(session, input),
            DynamicFunction::SeatAvailabilityResponse => self.seat_availability(session),
            DynamicFunction::FareResponse => self.fare(session),
            DynamicFunction::TrainsBetweenStationsResponse => self.trains_between(session),
        }
    }

    fn train_status(&self, session: &Session, input: &str) -> String {
        let train = train_from(session, input, DEFAULT_STATUS_TRAIN);
        match self.backend.running_status(&train) {
            RunningStatus::OnTime => {
                format!("Great news! Train {train} is running exactly on schedule.")
            }
            RunningStatus::LateTenMinutes => format!(
                "I've checked, and Train {train} is running approximately 10 minutes behind schedule. Not to worry, this is a minor delay."
            ),
            RunningStatus::LateThirtyMinutes => format!(
                "I'm sorry to inform you that Train {train} is currently running about 30 minutes late. We apologize for any inconvenience."
            ),
            RunningStatus::DelayedOneHour => format!(
                "Unfortunately, Train {train} is experiencing a delay of approximately 1 hour. We understand this is frustrating and apologize for the inconvenience."
            ),
        }
    }

    fn train_schedule(&self, session: &Session, input: &str) -> String {
        let train = train_from(session, input, DEFAULT_SCHEDULE_TRAIN);
        let schedule = self.backend.schedule(&train);
        format!(
            "Perfect! Train {train} departs at {} and arrives at {}. The total journey time is {}. Is there anything else you'd like to know about this train?",
            schedule.departure, schedule.arrival, schedule.duration
        )
    }

    fn booking_confirmation(&self, session: &Session) -> String {
        let class = session.get(fields::TRAIN_CLASS).unwrap_or(DEFAULT_CLASS);
        let train = session
            .get(fields::TRAIN_NUMBER)
            .unwrap_or(DEFAULT_STATUS_TRAIN);
        let pnr = self.backend.book(train, class);
        format!(
            "Excellent! Your booking has been confirmed successfully. You have booked a {class} class ticket on Train {train}. Your PNR number is {pnr}. Please save this PNR for future reference. Your ticket details will be sent to your registered mobile number. Is there anything else I can help you with?"
        )
    }

    fn cancellation(&self, session: &Session, input: &str) -> String {
        let pnr = session.get(fields::PNR).unwrap_or(input);
        let refund = self.backend.cancel(pnr);
        format!(
            "I've successfully cancelled your ticket with PNR {pnr}. Your refund of ₹{refund} will be processed and credited back to your original payment method within 5 to 7 business days. A cancellation confirmation SMS will be sent to your registered mobile number. Thank you for using our service, and I'm sorry we couldn't accommodate your travel plans this time."
        )
    }

    fn pnr_status(&self, session: &Session, input: &str) -> String {
        let pnr = session.get(fields::PNR).unwrap_or(input);
        let status = self.backend.pnr_status(pnr, class_of(session).unwrap_or_default());
        format!(
            "Thank you for your PNR {pnr}. I've checked your booking status. Your ticket is {}. You have been assigned {} in Coach {}. Is there anything else I can help you with?",
            status.status, status.berth, status.coach
        )
    }

    fn seat_availability(&self, session: &Session) -> String {
        let train = session
            .get(fields::TRAIN_NUMBER)
            .unwrap_or(DEFAULT_STATUS_TRAIN);
        let class = class_of(session).unwrap_or(DEFAULT_CLASS);
        let date = session.get(fields::TRAVEL_DATE).unwrap_or("Tomorrow");
        let seats = self.backend.seat_availability(train, class, date);
        format!(
            "Great! I've checked seat availability for Train {train} on {date} in {class} class. There are {} seats currently available, and {} on the waiting list. Would you like to proceed with booking, or check another date?",
            seats.available, seats.waiting
        )
    }

    fn fare(&self, session: &Session) -> String {
        let train = session
            .get(fields::TRAIN_NUMBER)
            .unwrap_or(DEFAULT_STATUS_TRAIN);
        let class = class_of(session).unwrap_or(DEFAULT_CLASS);
        let fare = self.backend.fare(train, class);
        format!(
            "Thank you! The fare for Train {train} in {class} class between your selected stations is ₹{fare}. This includes base fare and reservation charges. Would you like to proceed with booking, or check another class?"
        )
    }

    fn trains_between(&self, session: &Session) -> String {
        let source = session.get(fields::SOURCE_STATION).unwrap_or("Source");
        let destination = session
            .get(fields::DESTINATION_STATION)
            .unwrap_or("Destination");
        let trains = self.backend.trains_between(source, destination);

        let mut response = format!(
            "I found {} trains running between {source} and {destination}. ",
            trains.len()
        );
        for train in &trains {
            response.push_str(&format!(
                "Train {} {} departs at {} and arrives at {}, journey time {}. ",
                train.number, train.name, train.departure, train.arrival, train.duration
            ));
        }
        response.push_str("Would you like more details about any specific train?");
        response
    }
}

/// 会话中的车次；缺失时取输入末尾 5 个字符，再缺失用默认车次
fn train_from(session: &Session, input: &str, default: &str) -> String {
    if let Some(train) = session.get(fields::TRAIN_NUMBER) {
        return train.to_string();
    }
    let chars: Vec<char> = input.chars().collect();
    if chars.len() >= 5 {
        chars[chars.len() - 5..].iter().collect()
    } else {
        default.to_string()
    }
}

fn class_of(session: &Session) -> Option<&str> {
    session
        .get(fields::TRAIN_CLASS)
        .or_else(|| session.get(fields::CLASS))
}
