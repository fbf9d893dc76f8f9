use std::sync::Arc;

use crate::platforms::traits::ProfileLister;

pub struct ListerRegistry {
    listers: Vec<Arc<dyn ProfileLister>>,
}

impl ListerRegistry {
    pub fn new() -> Self {
        Self {
            listers: Vec::new(),
        }
    }

    pub fn register(&mut self, lister: Arc<dyn ProfileLister>) {
        self.listers.push(lister);
    }

    pub fn find_lister(&self, url: &str) -> Option<&dyn ProfileLister> {
        self.listers
            .iter()
            .find(|l| l.can_handle(url))
            .map(|l| l.as_ref())
    }
}

impl Default for ListerRegistry {
    fn default() -> Self {
        Self::new()
    }
}
