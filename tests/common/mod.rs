use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tacplus::profile::AuthorizationProfile;
use tacplus::transport::{Connector, Transport, TransportError};
use tacplus_client::{ArgumentFlags, AuthorizationResult};

/// A transport call as observed by [`MockConnector`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Open,
    Configure(Option<PathBuf>),
    Create(AuthorizationProfile),
    SetUser(String),
    AddAttribute(String),
    Send,
    Attribute(usize),
    Release,
}

/// A step the mock can be told to fail at.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Open,
    Configure,
    Create,
    SetUser,
    AddAttribute(usize),
    Send,
    Attribute(usize),
}

/// Hands out sessions that record every call and answer with a scripted reply.
#[derive(Debug, Clone)]
pub struct MockConnector {
    calls: Rc<RefCell<Vec<Call>>>,
    status: u8,
    attributes: Vec<String>,
    fail_at: Option<Step>,
}

impl MockConnector {
    pub fn replying(status: u8, attributes: &[&str]) -> Self {
        Self {
            calls: Rc::default(),
            status,
            attributes: attributes.iter().map(|attribute| attribute.to_string()).collect(),
            fail_at: None,
        }
    }

    pub fn failing_at(mut self, step: Step) -> Self {
        self.fail_at = Some(step);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }
}

fn check(fail_at: Option<Step>, step: Step) -> Result<(), TransportError> {
    if fail_at == Some(step) {
        Err(TransportError::new("scripted failure"))
    } else {
        Ok(())
    }
}

impl Connector for MockConnector {
    type Session = MockSession;

    fn open(&self) -> Result<MockSession, TransportError> {
        self.calls.borrow_mut().push(Call::Open);
        check(self.fail_at, Step::Open)?;

        Ok(MockSession {
            script: self.clone(),
            added: 0,
        })
    }
}

pub struct MockSession {
    script: MockConnector,
    added: usize,
}

impl MockSession {
    fn record(&self, call: Call) {
        self.script.calls.borrow_mut().push(call);
    }

    fn check(&self, step: Step) -> Result<(), TransportError> {
        check(self.script.fail_at, step)
    }
}

impl Transport for MockSession {
    fn configure(&mut self, path: Option<&Path>) -> Result<(), TransportError> {
        self.record(Call::Configure(path.map(Path::to_path_buf)));
        self.check(Step::Configure)
    }

    fn create_authorization(
        &mut self,
        profile: &AuthorizationProfile,
    ) -> Result<(), TransportError> {
        self.record(Call::Create(*profile));
        self.check(Step::Create)
    }

    fn set_user(&mut self, user: &str) -> Result<(), TransportError> {
        self.record(Call::SetUser(user.to_owned()));
        self.check(Step::SetUser)
    }

    fn add_attribute(&mut self, flags: ArgumentFlags, pair: &str) -> Result<(), TransportError> {
        assert!(flags.is_empty(), "pairs should be passed through without flags");

        self.record(Call::AddAttribute(pair.to_owned()));
        let index = self.added;
        self.added += 1;
        self.check(Step::AddAttribute(index))
    }

    fn send(&mut self) -> Result<AuthorizationResult, TransportError> {
        self.record(Call::Send);
        self.check(Step::Send)?;
        Ok(AuthorizationResult::new(
            self.script.status,
            self.script.attributes.len(),
        ))
    }

    fn attribute(&mut self, index: usize) -> Result<String, TransportError> {
        self.record(Call::Attribute(index));
        self.check(Step::Attribute(index))?;
        self.script
            .attributes
            .get(index)
            .cloned()
            .ok_or_else(|| TransportError::new(format!("no attribute at index {index}")))
    }
}

impl Drop for MockSession {
    fn drop(&mut self) {
        self.record(Call::Release);
    }
}

/// Runs the program against `connector`, returning the exit status and everything reported.
pub fn run(connector: &MockConnector, args: &[&str]) -> (u8, String) {
    let mut report = Vec::new();
    let status = tacplus::run(
        std::iter::once("tacplus").chain(args.iter().copied()),
        connector,
        &mut report,
    );

    (status, String::from_utf8(report).expect("report should be UTF-8"))
}
