#![allow(dead_code)]

use anyhow::{Context, Result};
use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use ipm::credentials::Credential;
use ipm::launcher::UriLauncher;
use ipm::package::{
    ClientFactory, InstalledPackage, OutdatedPackage, PackageManager, UpdateOutcome,
};
use ipm::prompt::Prompt;
use ipm::registry::{PackageInfo, SearchQuery, SearchResult};

pub const ACCESS_KEY_URI: &str = "inkdrop://ipm/access-key";

/// Answers prompts from a fixed script and remembers what was asked
#[derive(Default)]
pub struct ScriptedPrompt {
    answers: RefCell<VecDeque<String>>,
    pub asked: RefCell<Vec<String>>,
}

impl ScriptedPrompt {
    pub fn new(answers: &[&str]) -> Self {
        Self {
            answers: RefCell::new(answers.iter().map(|a| a.to_string()).collect()),
            asked: RefCell::new(Vec::new()),
        }
    }
}

impl Prompt for ScriptedPrompt {
    async fn ask(&self, message: &str) -> Result<String> {
        self.asked.borrow_mut().push(message.to_string());
        let answer = self
            .answers
            .borrow_mut()
            .pop_front()
            .with_context(|| format!("no scripted answer for {:?}", message))?;
        Ok(answer.trim().to_string())
    }
}

#[derive(Default)]
pub struct RecordingLauncher {
    pub opened: RefCell<Vec<String>>,
}

impl UriLauncher for RecordingLauncher {
    fn open(&self, uri: &str) -> Result<()> {
        self.opened.borrow_mut().push(uri.to_string());
        Ok(())
    }
}

/// State shared between a test and the clients its factory hands out
#[derive(Default)]
pub struct Registry {
    pub installed: Vec<InstalledPackage>,
    pub calls: Vec<String>,
    pub credentials: Vec<Option<Credential>>,
}

#[derive(Clone, Default)]
pub struct FakeFactory {
    pub registry: Rc<RefCell<Registry>>,
}

impl FakeFactory {
    pub fn with_installed(installed: Vec<InstalledPackage>) -> Self {
        let factory = Self::default();
        factory.registry.borrow_mut().installed = installed;
        factory
    }

    pub fn calls(&self) -> Vec<String> {
        self.registry.borrow().calls.clone()
    }
}

impl ClientFactory for FakeFactory {
    type Client = FakeClient;

    fn connect(&self, credential: Option<Credential>) -> Result<FakeClient> {
        self.registry.borrow_mut().credentials.push(credential);
        Ok(FakeClient {
            registry: Rc::clone(&self.registry),
        })
    }
}

pub struct FakeClient {
    registry: Rc<RefCell<Registry>>,
}

impl FakeClient {
    fn record(&self, call: &str) {
        self.registry.borrow_mut().calls.push(call.to_string());
    }
}

impl PackageManager for FakeClient {
    async fn installed(&self) -> Result<Vec<InstalledPackage>> {
        self.record("installed");
        Ok(self.registry.borrow().installed.clone())
    }

    async fn outdated(&self) -> Result<Vec<OutdatedPackage>> {
        self.record("outdated");
        Ok(Vec::new())
    }

    async fn install(&self, name: &str, version: Option<&str>) -> Result<InstalledPackage> {
        self.record("install");
        Ok(package(name, version.unwrap_or("1.0.0"), None))
    }

    async fn update(&self, name: &str, _version: Option<&str>) -> Result<UpdateOutcome> {
        self.record("update");
        Ok(UpdateOutcome::UpToDate {
            name: name.to_string(),
            version: "1.0.0".to_string(),
        })
    }

    async fn uninstall(&self, name: &str) -> Result<bool> {
        self.record("uninstall");
        let mut registry = self.registry.borrow_mut();
        let before = registry.installed.len();
        registry.installed.retain(|p| p.name != name);
        Ok(registry.installed.len() != before)
    }

    async fn search(&self, _query: &SearchQuery) -> Result<Vec<SearchResult>> {
        self.record("search");
        Ok(Vec::new())
    }

    async fn package_info(&self, _name: &str) -> Result<Option<PackageInfo>> {
        self.record("info");
        Ok(None)
    }
}

pub fn package(name: &str, version: &str, description: Option<&str>) -> InstalledPackage {
    InstalledPackage {
        name: name.to_string(),
        version: version.to_string(),
        description: description.map(str::to_string),
    }
}

pub fn plain_output() -> Vec<u8> {
    colored::control::set_override(false);
    Vec::new()
}
