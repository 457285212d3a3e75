//! 联系表单：字段、校验与提交状态
//!
//! 只负责本地状态机（Idle → Submitting → Success / Error）；实际投递由调用方完成，
//! 投递结果通过 `finish_submit` 回灌。

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::Regex;
use thiserror::Error;

use crate::content::{ContactSubmission, ContactSubmitResponse};

const MIN_NAME_CHARS: usize = 2;
const MIN_SUBJECT_CHARS: usize = 5;
const MIN_MESSAGE_CHARS: usize = 20;
const MAX_NAME_CHARS: usize = 255;
const MAX_SUBJECT_CHARS: usize = 500;
const MAX_MESSAGE_CHARS: usize = 5000;
const MAX_COMPANY_CHARS: usize = 255;

static EMAIL_RE: OnceLock<Regex> = OnceLock::new();

fn email_re() -> &'static Regex {
    EMAIL_RE.get_or_init(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex"))
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ContactField {
    Name,
    Email,
    Subject,
    Message,
    Company,
}

impl ContactField {
    pub const ALL: [ContactField; 5] = [
        ContactField::Name,
        ContactField::Email,
        ContactField::Subject,
        ContactField::Message,
        ContactField::Company,
    ];

    /// 与请求体字段名一致
    pub fn key(&self) -> &'static str {
        match self {
            ContactField::Name => "sender_name",
            ContactField::Email => "sender_email",
            ContactField::Subject => "subject",
            ContactField::Message => "message_body",
            ContactField::Company => "company_name",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|f| f.key() == key)
    }
}

/// 字段 → 错误提示
pub type FieldErrors = BTreeMap<ContactField, String>;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SubmitStatus {
    #[default]
    Idle,
    Submitting,
    Success,
    Error,
}

/// begin_submit 被拒绝的原因
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubmitRejected {
    #[error("Form has {} invalid field(s)", .0.len())]
    Invalid(FieldErrors),

    #[error("A submission is already in flight")]
    InFlight,
}

#[derive(Clone, Debug, Default)]
pub struct ContactForm {
    sender_name: String,
    sender_email: String,
    subject: String,
    message_body: String,
    company_name: String,
    errors: FieldErrors,
    status: SubmitStatus,
}

impl ContactForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// 修改字段，并清掉该字段上的错误提示
    pub fn set(&mut self, field: ContactField, value: impl Into<String>) {
        *self.slot_mut(field) = value.into();
        self.errors.remove(&field);
    }

    pub fn value(&self, field: ContactField) -> &str {
        match field {
            ContactField::Name => &self.sender_name,
            ContactField::Email => &self.sender_email,
            ContactField::Subject => &self.subject,
            ContactField::Message => &self.message_body,
            ContactField::Company => &self.company_name,
        }
    }

    fn slot_mut(&mut self, field: ContactField) -> &mut String {
        match field {
            ContactField::Name => &mut self.sender_name,
            ContactField::Email => &mut self.sender_email,
            ContactField::Subject => &mut self.subject,
            ContactField::Message => &mut self.message_body,
            ContactField::Company => &mut self.company_name,
        }
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn error(&self, field: ContactField) -> Option<&str> {
        self.errors.get(&field).map(String::as_str)
    }

    pub fn status(&self) -> SubmitStatus {
        self.status
    }

    /// 纯校验，不修改表单
    pub fn check(&self) -> FieldErrors {
        let mut errors = FieldErrors::new();
        let mut reject = |field: ContactField, msg: String| {
            errors.insert(field, msg);
        };

        let name = self.sender_name.trim();
        let name_len = name.chars().count();
        if name.is_empty() {
            reject(ContactField::Name, "Required".into());
        } else if name_len < MIN_NAME_CHARS {
            reject(ContactField::Name, min_message(MIN_NAME_CHARS));
        } else if name_len > MAX_NAME_CHARS {
            reject(ContactField::Name, max_message(MAX_NAME_CHARS));
        }

        let email = self.sender_email.trim();
        if email.is_empty() {
            reject(ContactField::Email, "Required".into());
        } else if !email_re().is_match(email) {
            reject(ContactField::Email, "Invalid email".into());
        }

        let subject = self.subject.trim();
        let subject_len = subject.chars().count();
        if subject.is_empty() {
            reject(ContactField::Subject, "Required".into());
        } else if subject_len < MIN_SUBJECT_CHARS {
            reject(ContactField::Subject, min_message(MIN_SUBJECT_CHARS));
        } else if subject_len > MAX_SUBJECT_CHARS {
            reject(ContactField::Subject, max_message(MAX_SUBJECT_CHARS));
        }

        let message = self.message_body.trim();
        let message_len = message.chars().count();
        if message.is_empty() {
            reject(ContactField::Message, "Required".into());
        } else if message_len < MIN_MESSAGE_CHARS {
            reject(ContactField::Message, min_message(MIN_MESSAGE_CHARS));
        } else if message_len > MAX_MESSAGE_CHARS {
            reject(ContactField::Message, max_message(MAX_MESSAGE_CHARS));
        }

        if self.company_name.trim().chars().count() > MAX_COMPANY_CHARS {
            reject(ContactField::Company, max_message(MAX_COMPANY_CHARS));
        }

        errors
    }

    /// 校验并保存错误提示；返回是否通过
    pub fn validate(&mut self) -> bool {
        self.errors = self.check();
        self.errors.is_empty()
    }

    /// 开始提交：通过校验则进入 Submitting 并返回去除首尾空白的请求体
    pub fn begin_submit(&mut self) -> Result<ContactSubmission, SubmitRejected> {
        if self.status == SubmitStatus::Submitting {
            return Err(SubmitRejected::InFlight);
        }
        if !self.validate() {
            return Err(SubmitRejected::Invalid(self.errors.clone()));
        }
        self.status = SubmitStatus::Submitting;
        let company = self.company_name.trim();
        Ok(ContactSubmission {
            sender_name: self.sender_name.trim().to_string(),
            sender_email: self.sender_email.trim().to_string(),
            subject: self.subject.trim().to_string(),
            message_body: self.message_body.trim().to_string(),
            company_name: (!company.is_empty()).then(|| company.to_string()),
        })
    }

    /// 回灌投递结果：成功清空表单，失败保留输入；不在 Submitting 时忽略
    pub fn finish_submit(&mut self, delivered: bool) {
        if self.status != SubmitStatus::Submitting {
            tracing::debug!(status = ?self.status, "finish_submit ignored");
            return;
        }
        if delivered {
            for field in ContactField::ALL {
                self.slot_mut(field).clear();
            }
            self.errors.clear();
            self.status = SubmitStatus::Success;
        } else {
            self.status = SubmitStatus::Error;
        }
    }

    /// 用 POST /contact/submit 的响应结束本次提交
    pub fn apply_response(&mut self, response: &ContactSubmitResponse) {
        if response.success {
            tracing::info!(reference_id = response.reference_id, "contact message delivered");
        } else {
            tracing::warn!(message = %response.message, "contact message rejected");
        }
        self.finish_submit(response.success);
    }
}

fn min_message(limit: usize) -> String {
    format!("Min {limit} characters")
}

fn max_message(limit: usize) -> String {
    format!("Max {limit} characters")
}
