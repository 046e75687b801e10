use std::sync::Arc;

use ivrflow::response::{
    PnrStatus, RunningStatus, SeatAvailability, TrainSchedule, TrainSummary,
};
use ivrflow::{DynamicFunction, ReservationBackend, ResponseGenerator, Session};
use parking_lot::Mutex;

/// 固定数据后端，并记录收到的查询
#[derive(Default)]
struct FixedBackend {
    calls: Mutex<Vec<String>>,
}

impl FixedBackend {
    fn record(&self, call: String) {
        self.calls.lock().push(call);
    }
}

impl ReservationBackend for FixedBackend {
    fn running_status(&self, train_number: &str) -> RunningStatus {
        self.record(format!("status:{train_number}"));
        RunningStatus::LateThirtyMinutes
    }

    fn schedule(&self, train_number: &str) -> TrainSchedule {
        self.record(format!("schedule:{train_number}"));
        TrainSchedule {
            departure: "9:15 PM".into(),
            arrival: "6:40 AM".into(),
            duration: "9 hours 25 minutes".into(),
        }
    }

    fn book(&self, train_number: &str, train_class: &str) -> u64 {
        self.record(format!("book:{train_number}:{train_class}"));
        4_521_987_730
    }

    fn cancel(&self, pnr: &str) -> u32 {
        self.record(format!("cancel:{pnr}"));
        1250
    }

    fn pnr_status(&self, pnr: &str, train_class: &str) -> PnrStatus {
        self.record(format!("pnr:{pnr}:{train_class}"));
        PnrStatus {
            status: "Confirmed".into(),
            berth: "Side Lower".into(),
            coach: "B2".into(),
        }
    }

    fn seat_availability(&self, train_number: &str, train_class: &str, date: &str) -> SeatAvailability {
        self.record(format!("seats:{train_number}:{train_class}:{date}"));
        SeatAvailability {
            available: 12,
            waiting: 0,
        }
    }

    fn fare(&self, train_number: &str, train_class: &str) -> u32 {
        self.record(format!("fare:{train_number}:{train_class}"));
        1735
    }

    fn trains_between(&self, source: &str, destination: &str) -> Vec<TrainSummary> {
        self.record(format!("between:{source}:{destination}"));
        vec![TrainSummary {
            number: "12627".into(),
            name: "Karnataka Express".into(),
            departure: "7:20 PM".into(),
            arrival: "11:30 AM".into(),
            duration: "16h 10m".into(),
        }]
    }
}

fn generator() -> (Arc<FixedBackend>, ResponseGenerator) {
    let backend = Arc::new(FixedBackend::default());
    let generator = ResponseGenerator::new(backend.clone());
    (backend, generator)
}

#[test]
fn backend_can_be_replaced() {
    let (backend, generator) = generator();
    let mut session = Session::new();
    session.set("train_number", "12951");
    session.set("train_class", "AC 2 Tier");
    session.set("travel_date", "next friday");

    let status = generator.generate(DynamicFunction::TrainStatus, &session, "");
    assert!(status.contains("Train 12951 is currently running about 30 minutes late"));

    let fare = generator.generate(DynamicFunction::FareResponse, &session, "");
    assert!(fare.contains("₹1735"));

    let seats = generator.generate(DynamicFunction::SeatAvailabilityResponse, &session, "");
    assert!(seats.contains("on next friday in AC 2 Tier class"));
    assert!(seats.contains("12 seats currently available"));

    assert_eq!(
        *backend.calls.lock(),
        vec![
            "status:12951".to_string(),
            "fare:12951:AC 2 Tier".to_string(),
            "seats:12951:AC 2 Tier:next friday".to_string(),
        ]
    );
}

#[test]
fn class_falls_back_to_generic_class_field() {
    let (backend, generator) = generator();
    let mut session = Session::new();
    session.set("pnr", "4521987730");
    session.set("class", "Sleeper");

    let text = generator.generate(DynamicFunction::PnrStatusResponse, &session, "");

    assert!(text.contains("PNR 4521987730"));
    assert!(text.contains("Side Lower in Coach B2"));
    assert_eq!(*backend.calls.lock(), vec!["pnr:4521987730:Sleeper".to_string()]);
}

#[test]
fn cancellation_uses_raw_input_without_collected_pnr() {
    let (backend, generator) = generator();

    let text = generator.generate(
        DynamicFunction::CancellationConfirmation,
        &Session::new(),
        "8800112233",
    );

    assert!(text.contains("ticket with PNR 8800112233"));
    assert!(text.contains("₹1250"));
    assert_eq!(*backend.calls.lock(), vec!["cancel:8800112233".to_string()]);
}

#[test]
fn trains_between_lists_every_result() {
    let (_, generator) = generator();
    let mut session = Session::new();
    session.set("source_station", "Bangalore");
    session.set("destination_station", "Chennai");

    let text = generator.generate(DynamicFunction::TrainsBetweenStationsResponse, &session, "");

    assert!(text.starts_with("I found 1 trains running between Bangalore and Chennai."));
    assert!(text.contains("Train 12627 Karnataka Express departs at 7:20 PM"));
}

#[test]
fn flow_names_dispatch_to_handlers() {
    let (backend, generator) = generator();
    let mut session = Session::new();
    session.set("train_number", "12718");

    let text = generator.generate_by_name("train_schedule", &session, "");
    assert!(text.contains("departs at 9:15 PM and arrives at 6:40 AM"));

    let agent = generator.generate_by_name("connect_agent", &session, "");
    assert!(agent.contains("customer support agents"));
    assert_eq!(*backend.calls.lock(), vec!["schedule:12718".to_string()]);
}
