//! Collaborators a session trains and tests against

use crate::core::{FeatureSet, Preprocessor};
use crate::kernel::Kernel;
use std::sync::Arc;

/// Training/test features, preprocessor and kernel
#[derive(Default)]
pub struct Environment {
    pub(crate) train_features: Option<Box<dyn FeatureSet>>,
    pub(crate) test_features: Option<Box<dyn FeatureSet>>,
    pub(crate) preprocessor: Option<Box<dyn Preprocessor>>,
    pub(crate) kernel: Option<Arc<dyn Kernel>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_train_features<F: FeatureSet + 'static>(mut self, features: F) -> Self {
        self.train_features = Some(Box::new(features));
        self
    }

    pub fn with_test_features<F: FeatureSet + 'static>(mut self, features: F) -> Self {
        self.test_features = Some(Box::new(features));
        self
    }

    pub fn with_preprocessor<P: Preprocessor + 'static>(mut self, preproc: P) -> Self {
        self.preprocessor = Some(Box::new(preproc));
        self
    }

    pub fn with_kernel(mut self, kernel: Arc<dyn Kernel>) -> Self {
        self.kernel = Some(kernel);
        self
    }

    pub fn set_train_features(&mut self, features: Option<Box<dyn FeatureSet>>) {
        self.train_features = features;
    }

    pub fn set_test_features(&mut self, features: Option<Box<dyn FeatureSet>>) {
        self.test_features = features;
    }

    /// Replacing the preprocessor drops any fitted state of the old one
    pub fn set_preprocessor(&mut self, preproc: Option<Box<dyn Preprocessor>>) {
        self.preprocessor = preproc;
    }

    pub fn set_kernel(&mut self, kernel: Option<Arc<dyn Kernel>>) {
        self.kernel = kernel;
    }

    pub fn train_features(&self) -> Option<&dyn FeatureSet> {
        self.train_features.as_deref()
    }

    pub fn test_features(&self) -> Option<&dyn FeatureSet> {
        self.test_features.as_deref()
    }

    pub fn preprocessor(&self) -> Option<&dyn Preprocessor> {
        self.preprocessor.as_deref()
    }

    pub fn kernel(&self) -> Option<&Arc<dyn Kernel>> {
        self.kernel.as_ref()
    }
}
