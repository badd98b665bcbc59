// Creation session: owned by the create page, shared with the upload form and the composer
use std::cell::RefCell;
use std::rc::Rc;

#[derive(Default)]
struct SessionInner {
    image_url: RefCell<Option<String>>,
    on_change: RefCell<Option<Rc<dyn Fn()>>>,
}

/// Holds the URL of the image uploaded during one profile-creation flow.
/// Cloning shares the same session; it is gone once the last clone drops.
#[derive(Clone, Default)]
pub struct CreationSession {
    inner: Rc<SessionInner>,
}

impl PartialEq for CreationSession {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl CreationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn image_url(&self) -> Option<String> {
        self.inner.image_url.borrow().clone()
    }

    pub fn publish_image_url(&self, url: String) {
        *self.inner.image_url.borrow_mut() = Some(url);
        let cb = self.inner.on_change.borrow().clone();
        if let Some(cb) = cb {
            cb();
        }
    }

    /// Registers the single change listener (replacing any previous one).
    pub fn watch(&self, f: impl Fn() + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Rc::new(f));
    }

    pub fn unwatch(&self) {
        self.inner.on_change.borrow_mut().take();
    }
}
