#[allow(unused_imports)]
pub(crate) use self::inner::*;

#[cfg(loom)]
mod inner {
    #![allow(unused_imports)]
    pub(crate) use loom::{hint, model, sync, thread};
}

#[cfg(not(loom))]
mod inner {
    #![allow(unused_imports, dead_code)]
    pub(crate) use core::hint;
    pub(crate) use std::{sync, thread};

    #[cfg(test)]
    pub(crate) fn model(f: impl Fn()) {
        let _trace = crate::util::test::trace_init();
        f()
    }

}
