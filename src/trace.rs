use crate::error::Result;
use serde_json::json;
use std::{collections::HashMap, fs::File, io::BufWriter};
use uuid::Uuid;

pub fn create_trace_logger(
    filename: Option<String>,
    maze_width: usize,
    maze_length: usize,
) -> Box<dyn TraceLogger> {
    match filename {
        None => Box::new(NoOpTraceLogger {}),
        Some(filename) => Box::new(JsonTraceLogger::new(filename, maze_width, maze_length)),
    }
}

pub trait TraceLogger: Send + Sync {
    #[allow(unused_variables)]
    fn log_generation(&mut self, generation: usize, completed: usize, best_length: Option<usize>) {}

    #[allow(unused_variables)]
    fn log_event(&mut self, generation: usize, event: Event) {}

    fn clear(&mut self) {}

    fn save(&self) -> Result<()> {
        Ok(())
    }

    fn log_route_completed(&mut self, generation: usize, ant: usize, length: usize) {
        self.log_event(
            generation,
            Event {
                event_type: EventType::RouteCompleted,
                ant: Some(ant),
                length: Some(length),
            },
        );
    }

    fn log_unfinished(&mut self, generation: usize, ant: usize) {
        self.log_event(
            generation,
            Event {
                event_type: EventType::Unfinished,
                ant: Some(ant),
                length: None,
            },
        );
    }

    fn log_new_best(&mut self, generation: usize, length: usize) {
        self.log_event(
            generation,
            Event {
                event_type: EventType::NewBest,
                ant: None,
                length: Some(length),
            },
        );
    }
}

#[derive(serde::Serialize)]
enum EventType {
    RouteCompleted,
    Unfinished,
    NewBest,
}

#[derive(serde::Serialize)]
pub struct Event {
    event_type: EventType,
    ant: Option<usize>,
    length: Option<usize>,
}

struct Generation {
    generation: usize,
    completed: usize,
    best_length: Option<usize>,
}

struct NoOpTraceLogger;
impl TraceLogger for NoOpTraceLogger {}

struct JsonTraceLogger {
    filename: String,
    run_id: String,
    maze_width: usize,
    maze_length: usize,
    generations: Vec<Generation>,
    events: HashMap<usize, Vec<Event>>,
}

impl JsonTraceLogger {
    pub fn new(filename: String, maze_width: usize, maze_length: usize) -> JsonTraceLogger {
        JsonTraceLogger {
            filename,
            run_id: Uuid::new_v4().to_string(),
            maze_width,
            maze_length,
            generations: Vec::new(),
            events: HashMap::new(),
        }
    }
}

impl TraceLogger for JsonTraceLogger {
    fn log_generation(&mut self, generation: usize, completed: usize, best_length: Option<usize>) {
        self.generations.push(Generation {
            generation,
            completed,
            best_length,
        });
    }

    fn log_event(&mut self, generation: usize, event: Event) {
        self.events.entry(generation).or_default().push(event);
    }

    fn clear(&mut self) {
        self.generations.clear();
        self.events.clear();
    }

    fn save(&self) -> Result<()> {
        let file = File::create(&self.filename)?;
        let generations: Vec<_> = self
            .generations
            .iter()
            .map(|generation| {
                json!({
                    "generation": generation.generation,
                    "completed": generation.completed,
                    "best_length": generation.best_length,
                    "events": self.events.get(&generation.generation).unwrap_or(&Vec::new()),
                })
            })
            .collect();

        let data = json!({
            "run_id": self.run_id,
            "maze": {
                "width": self.maze_width,
                "length": self.maze_length,
            },
            "generations": generations,
        });

        let mut writer = BufWriter::new(&file);
        serde_json::to_writer_pretty(&mut writer, &data)?;
        Ok(())
    }
}
