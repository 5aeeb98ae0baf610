use std::time::{Duration, Instant};

use chrono::{DateTime, Local};
use log::{debug, info, warn};
use rand::{RngCore, seq::SliceRandom};

use super::{Delay, Simulation};

pub const GREETING: &str =
    "Smart Assist navigation system is ready. How can I help you navigate?";
pub const PROCESSING_TEXT: &str = "Processing your request...";
pub const LISTENING_TEXT: &str = "Listening...";

pub const COMMANDS: [&str; 6] = [
    "Navigate to the kitchen",
    "Find the nearest exit",
    "Avoid obstacles ahead",
    "Show me the safest path",
    "What objects do you see?",
    "Take me to the living room",
];

/// Commands suggested to the user under the message log.
pub const EXAMPLE_COMMANDS: [&str; 4] = [
    "Navigate to the kitchen",
    "Find the nearest exit",
    "Avoid obstacles ahead",
    "What objects do you see?",
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageStatus {
    Processing,
    Completed,
}

#[derive(Clone, Debug)]
pub struct VoiceMessage {
    pub id: u64,
    pub role: Role,
    pub text: String,
    pub timestamp: DateTime<Local>,
    pub status: MessageStatus,
}

impl VoiceMessage {
    pub fn time_label(&self) -> String {
        self.timestamp.format("%H:%M").to_string()
    }

    pub fn is_processing(&self) -> bool {
        self.status == MessageStatus::Processing
    }
}

/// Reply for a recognized command, picked by the first matching keyword.
pub fn canned_response(command: &str) -> &'static str {
    let command = command.to_lowercase();
    if command.contains("kitchen") {
        "I found a path to the kitchen. Turn right in 3 meters, then go straight for 5 meters. I detect a chair obstacle on the left side of the path."
    } else if command.contains("exit") {
        "The nearest exit is 12 meters ahead. I'll guide you there while avoiding the table and person I detected in the camera feed."
    } else if command.contains("obstacle") {
        "I detect 3 obstacles ahead: a chair at 2 meters, a table at 4 meters, and a person moving at 6 meters. Suggesting alternative path to the right."
    } else if command.contains("path") {
        "Calculating optimal path using STELLA-VSLAM data. The safest route is through the corridor with 94% confidence. No moving obstacles detected."
    } else if command.contains("objects") || command.contains("see") {
        "Current objects in view: 1 chair (87% confidence), 1 table (92% confidence), 1 person (95% confidence). All objects are being tracked for navigation."
    } else {
        "I understand your request. Analyzing the environment and calculating the best navigation path for you."
    }
}

#[derive(Clone, Debug)]
enum Stage {
    Idle,
    Listening { recognized: Delay },
    Speaking {
        command: String,
        placeholder_id: u64,
        answered: Delay,
    },
}

/// Simulated voice dialogue.
///
/// Listening resolves to a random canned command after the listen delay,
/// then a processing placeholder is answered after the response delay.
pub struct VoiceAssistant {
    messages: Vec<VoiceMessage>,
    current_command: String,
    stage: Stage,
    next_id: u64,
    listen_delay: Duration,
    response_delay: Duration,
}

impl VoiceAssistant {
    pub fn new(listen_delay: Duration, response_delay: Duration) -> Self {
        let mut assistant = Self {
            messages: Vec::new(),
            current_command: String::new(),
            stage: Stage::Idle,
            next_id: 1,
            listen_delay,
            response_delay,
        };
        assistant.append(Role::Assistant, GREETING, MessageStatus::Completed);
        assistant
    }

    pub fn messages(&self) -> &[VoiceMessage] {
        &self.messages
    }

    pub fn current_command(&self) -> &str {
        &self.current_command
    }

    pub fn is_listening(&self) -> bool {
        matches!(self.stage, Stage::Listening { .. })
    }

    pub fn is_speaking(&self) -> bool {
        matches!(self.stage, Stage::Speaking { .. })
    }

    /// Starts listening. Returns false when a response is still being spoken.
    pub fn start_listening(&mut self, now: Instant) -> bool {
        match self.stage {
            Stage::Speaking { .. } => {
                warn!("Ignoring listen request while a response is in progress");
                false
            }
            Stage::Listening { .. } => true,
            Stage::Idle => {
                info!("Listening for a voice command");
                self.current_command = LISTENING_TEXT.to_string();
                self.stage = Stage::Listening {
                    recognized: Delay::new(self.listen_delay, now),
                };
                true
            }
        }
    }

    /// Stops listening and drops the pending recognition.
    pub fn stop_listening(&mut self) {
        if self.is_listening() {
            info!("Listening cancelled");
            self.stage = Stage::Idle;
        }
        self.current_command.clear();
    }

    fn append(&mut self, role: Role, text: &str, status: MessageStatus) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.messages.push(VoiceMessage {
            id,
            role,
            text: text.to_string(),
            timestamp: Local::now(),
            status,
        });
        id
    }

    /// Records a recognized command and queues the assistant's answer.
    fn submit_command(&mut self, command: &str, now: Instant) {
        info!("Recognized command: {}", command);
        self.current_command = command.to_string();
        self.append(Role::User, command, MessageStatus::Completed);
        let placeholder_id = self.append(Role::Assistant, PROCESSING_TEXT, MessageStatus::Processing);
        self.stage = Stage::Speaking {
            command: command.to_string(),
            placeholder_id,
            answered: Delay::new(self.response_delay, now),
        };
    }

    fn resolve(&mut self, command: &str, placeholder_id: u64) {
        let response = canned_response(command);
        if let Some(message) = self.messages.iter_mut().find(|m| m.id == placeholder_id) {
            message.text = response.to_string();
            message.status = MessageStatus::Completed;
        }
        debug!("Answered command '{}'", command);
        self.stage = Stage::Idle;
    }
}

impl Simulation for VoiceAssistant {
    fn poll(&mut self, now: Instant, rng: &mut dyn RngCore) -> bool {
        match &self.stage {
            Stage::Idle => false,
            Stage::Listening { recognized } => {
                if !recognized.elapsed(now) {
                    return false;
                }
                let command = COMMANDS.choose(rng).copied().unwrap_or(COMMANDS[0]);
                self.submit_command(command, now);
                true
            }
            Stage::Speaking {
                command,
                placeholder_id,
                answered,
            } => {
                if !answered.elapsed(now) {
                    return false;
                }
                let (command, placeholder_id) = (command.clone(), *placeholder_id);
                self.resolve(&command, placeholder_id);
                true
            }
        }
    }

    fn next_deadline(&self) -> Option<Instant> {
        match &self.stage {
            Stage::Idle => None,
            Stage::Listening { recognized } => Some(recognized.deadline()),
            Stage::Speaking { answered, .. } => Some(answered.deadline()),
        }
    }

    fn resume(&mut self, now: Instant) {
        // restart whichever delay was running when the simulation paused
        match &mut self.stage {
            Stage::Idle => {}
            Stage::Listening { recognized } => *recognized = Delay::new(self.listen_delay, now),
            Stage::Speaking { answered, .. } => *answered = Delay::new(self.response_delay, now),
        }
    }
}
