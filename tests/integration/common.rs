use radio_music_collector::config::{CollectorConfig, Config, UserAgentConfig};
use radio_music_collector::output::{OutputResult, Reporter};
use radio_music_collector::Station;
use std::cell::RefCell;

/// Creates a station served from `base_url` under `prefix`
pub fn test_station(name: &str, base_url: &str, prefix: &str, rid: u32) -> Station {
    Station {
        name: name.to_string(),
        domain: format!("{}/{}/", base_url, prefix),
        rid,
        rs_id: None,
        hash: None,
        fetchable: true,
    }
}

/// Creates a configuration with a short fetch delay
pub fn test_config(data_dir: &str, stations: Vec<Station>) -> Config {
    Config {
        collector: CollectorConfig {
            data_dir: data_dir.to_string(),
            fetch_delay_ms: 100,
            require_all: false,
        },
        user_agent: UserAgentConfig {
            name: "TestCollector".to_string(),
            version: "1.0".to_string(),
        },
        stations,
    }
}

/// Reporter keeping every event for later assertions
#[derive(Default)]
pub struct RecordingReporter {
    pub events: RefCell<Vec<String>>,
    pub summaries: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn has_event(&self, prefix: &str) -> bool {
        self.events.borrow().iter().any(|e| e.starts_with(prefix))
    }

    fn push(&self, event: String) {
        self.events.borrow_mut().push(event);
    }
}

impl Reporter for RecordingReporter {
    fn info(&self, message: &str) {
        self.push(format!("info: {}", message));
    }

    fn notice(&self, title: &str, message: &str) {
        self.push(format!("notice {}: {}", title, message));
    }

    fn warn(&self, title: &str, message: &str) {
        self.push(format!("warn {}: {}", title, message));
    }

    fn error(&self, title: &str, message: &str) {
        self.push(format!("error {}: {}", title, message));
    }

    fn group(&self, name: &str) {
        self.push(format!("group: {}", name));
    }

    fn group_end(&self) {
        self.push("group end".to_string());
    }

    fn summary(&self, markdown: &str) -> OutputResult<()> {
        self.summaries.borrow_mut().push(markdown.to_string());
        Ok(())
    }
}
