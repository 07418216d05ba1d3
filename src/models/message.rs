use serde::{Deserialize, Serialize};

use super::conversation::{default_read, normalize_phone_number};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    id: i64,
    thread_id: i64,
    #[serde(default)]
    body: String,
    #[serde(default)]
    date: i64,
    #[serde(default = "default_read")]
    read: bool,
    #[serde(default)]
    sender_name: String,
    #[serde(default)]
    sender_photo_uri: String,
    #[serde(default)]
    participants: Vec<Participant>,
    #[serde(default)]
    is_scheduled: bool,
}

impl Message {
    pub fn new(id: i64, thread_id: i64, body: impl Into<String>) -> Self {
        Self {
            id,
            thread_id,
            body: body.into(),
            date: 0,
            read: true,
            sender_name: String::new(),
            sender_photo_uri: String::new(),
            participants: vec![],
            is_scheduled: false,
        }
    }

    pub fn with_date(mut self, date: i64) -> Self {
        self.date = date;
        self
    }

    pub fn with_read(mut self, read: bool) -> Self {
        self.read = read;
        self
    }

    pub fn with_sender_name(mut self, sender_name: impl Into<String>) -> Self {
        self.sender_name = sender_name.into();
        self
    }

    pub fn with_sender_photo_uri(mut self, sender_photo_uri: impl Into<String>) -> Self {
        self.sender_photo_uri = sender_photo_uri.into();
        self
    }

    pub fn with_participants(mut self, participants: Vec<Participant>) -> Self {
        self.participants = participants;
        self
    }

    pub fn with_scheduled(mut self, is_scheduled: bool) -> Self {
        self.is_scheduled = is_scheduled;
        self
    }

    /// Re-files the message under another thread.
    pub fn with_thread_id(mut self, thread_id: i64) -> Self {
        self.thread_id = thread_id;
        self
    }

    pub fn id(&self) -> i64 {
        self.id
    }

    pub fn thread_id(&self) -> i64 {
        self.thread_id
    }

    pub fn body(&self) -> &str {
        &self.body
    }

    pub fn date(&self) -> i64 {
        self.date
    }

    pub fn read(&self) -> bool {
        self.read
    }

    pub fn sender_name(&self) -> &str {
        &self.sender_name
    }

    pub fn sender_photo_uri(&self) -> &str {
        &self.sender_photo_uri
    }

    pub fn participants(&self) -> &[Participant] {
        &self.participants
    }

    pub fn is_scheduled(&self) -> bool {
        self.is_scheduled
    }

    /// Name shown for the message in search results. Falls back to the
    /// distinct participant names when the sender has no name.
    pub fn recipient_label(&self) -> String {
        if !self.sender_name.is_empty() || self.participants.is_empty() {
            return self.sender_name.clone();
        }

        let mut names: Vec<&str> = vec![];
        for participant in &self.participants {
            let name = participant.name();
            if !name.is_empty() && !names.contains(&name) {
                names.push(name);
            }
        }
        names.join(", ")
    }

    /// Normalized number of the first participant, if any.
    pub fn first_phone_number(&self) -> String {
        self.participants
            .first()
            .and_then(|p| p.phone_numbers().first())
            .map(|n| n.normalized_number())
            .unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Participant {
    #[serde(default)]
    name: String,
    #[serde(default)]
    photo_uri: String,
    #[serde(default)]
    phone_numbers: Vec<PhoneNumber>,
}

impl Participant {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_photo_uri(mut self, photo_uri: impl Into<String>) -> Self {
        self.photo_uri = photo_uri.into();
        self
    }

    pub fn with_phone_number(mut self, number: PhoneNumber) -> Self {
        self.phone_numbers.push(number);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn photo_uri(&self) -> &str {
        &self.photo_uri
    }

    pub fn phone_numbers(&self) -> &[PhoneNumber] {
        &self.phone_numbers
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhoneNumber {
    value: String,
    #[serde(default)]
    normalized_number: String,
}

impl PhoneNumber {
    pub fn new(value: impl Into<String>) -> Self {
        let value = value.into();
        let normalized_number = normalize_phone_number(&value);
        Self {
            value,
            normalized_number,
        }
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Exports do not always carry the normalized form; derive it then.
    pub fn normalized_number(&self) -> String {
        if self.normalized_number.is_empty() {
            return normalize_phone_number(&self.value);
        }
        self.normalized_number.clone()
    }
}
