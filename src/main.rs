use std::sync::{Arc, RwLock};
use std::thread;
use std::time::Duration;

use fieldscope::{ChangeRecorder, FieldValue, Inspect, InspectError};

struct Point {
    x: i64,
    y: i64,
}

impl Inspect for Point {
    fn fields(&self) -> Result<Vec<(String, FieldValue)>, InspectError> {
        Ok(vec![("x".into(), self.x.into()), ("y".into(), self.y.into())])
    }
}

fn main() {
    simple_logger::SimpleLogger::new()
        .with_level(log::LevelFilter::Info)
        .env()
        .init()
        .unwrap();

    let point = Arc::new(RwLock::new(Point { x: 1, y: 2 }));

    let mut recorder = ChangeRecorder::new(Arc::clone(&point));
    recorder.start();

    thread::sleep(Duration::from_millis(40));

    {
        let mut point = point.write().unwrap();
        point.x = 1337;
        point.y = 3100;
    }

    thread::sleep(Duration::from_millis(40));

    println!("{:?}", recorder.all_changes());

    if let Err(err) = recorder.stop() {
        log::error!("failed to stop recorder: {}", err);
    }
}
