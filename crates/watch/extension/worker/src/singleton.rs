use std::rc::Rc;

use once_cell::unsync::OnceCell;

use crate::Error;

/// Holds the one background instance. Initializing it a second time fails and keeps the first.
#[derive(Debug)]
pub(crate) struct Singleton<T> {
    inner: OnceCell<Rc<T>>,
}

impl<T> Singleton<T> {
    pub(crate) const fn new() -> Self {
        Self {
            inner: OnceCell::new(),
        }
    }

    // `build` only runs when nothing is stored yet
    pub(crate) fn initialize(
        &self,
        build: impl FnOnce() -> Result<Rc<T>, Error>,
    ) -> Result<Rc<T>, Error> {
        if self.inner.get().is_some() {
            return Err(Error::AlreadyInitialized);
        }

        let value = build()?;
        self.inner
            .set(value.clone())
            .map_err(|_| Error::AlreadyInitialized)?;
        Ok(value)
    }

    #[cfg(test)]
    pub(crate) fn get(&self) -> Option<&Rc<T>> {
        self.inner.get()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    #[test]
    fn second_initialize_is_refused() {
        let singleton = Singleton::new();

        let first = singleton.initialize(|| Ok(Rc::new(1))).unwrap();
        assert_eq!(*first, 1);

        let built = Cell::new(false);
        let second = singleton.initialize(|| {
            built.set(true);
            Ok(Rc::new(2))
        });

        assert_eq!(second, Err(Error::AlreadyInitialized));
        assert!(!built.get(), "second instance was built");
        assert_eq!(singleton.get().map(|value| **value), Some(1));
    }

    #[test]
    fn failed_build_leaves_it_empty() {
        let singleton = Singleton::<u8>::new();

        let failed = singleton.initialize(|| Err(Error::MissingComponent("host")));
        assert_eq!(failed, Err(Error::MissingComponent("host")));
        assert!(singleton.get().is_none());

        assert!(singleton.initialize(|| Ok(Rc::new(3))).is_ok());
    }
}
