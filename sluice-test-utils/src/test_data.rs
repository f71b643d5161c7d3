// Copyright 2025 Umberto Gotti <umberto.gotti@umbertogotti.dev>
// Licensed under the Apache License, Version 2.0
// http://www.apache.org/licenses/LICENSE-2.0

use core::fmt;

/// A click on a labelled button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    pub label: &'static str,
}

impl ClickEvent {
    pub const fn new(label: &'static str) -> Self {
        Self { label }
    }
}

impl fmt::Display for ClickEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "click({})", self.label)
    }
}

pub const fn click_a() -> ClickEvent {
    ClickEvent::new("A")
}

pub const fn click_b() -> ClickEvent {
    ClickEvent::new("B")
}

pub const fn click_c() -> ClickEvent {
    ClickEvent::new("C")
}

pub const fn click_d() -> ClickEvent {
    ClickEvent::new("D")
}

/// A user suggested by the people-to-follow lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: u64,
    pub login: String,
}

impl User {
    pub fn new(id: u64, login: impl Into<String>) -> Self {
        Self {
            id,
            login: login.into(),
        }
    }
}

pub fn user_alice() -> User {
    User::new(1, "alice")
}

pub fn user_bob() -> User {
    User::new(2, "bob")
}

pub fn user_charlie() -> User {
    User::new(3, "charlie")
}
