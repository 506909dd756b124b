//! Directory of workers known to the master.

use std::collections::{BTreeSet, HashSet};

/// Answers whether the master knows a worker by name.
pub trait WorkerDirectory {
    fn is_known(&self, name: &str) -> bool;
}

impl WorkerDirectory for [String] {
    fn is_known(&self, name: &str) -> bool {
        self.iter().any(|w| w == name)
    }
}

impl WorkerDirectory for [&str] {
    fn is_known(&self, name: &str) -> bool {
        self.iter().any(|w| *w == name)
    }
}

impl WorkerDirectory for Vec<String> {
    fn is_known(&self, name: &str) -> bool {
        self.as_slice().is_known(name)
    }
}

impl WorkerDirectory for HashSet<String> {
    fn is_known(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl WorkerDirectory for BTreeSet<String> {
    fn is_known(&self, name: &str) -> bool {
        self.contains(name)
    }
}

impl<T: WorkerDirectory + ?Sized> WorkerDirectory for &T {
    fn is_known(&self, name: &str) -> bool {
        (**self).is_known(name)
    }
}
