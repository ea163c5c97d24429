//! Receiver slots, sentinel values and interface markers used by every export

use crate::interfaces::ISlangUnknown;

/// The value an export returns in place of a call it could not make.
pub trait Sentinel {
    fn sentinel() -> Self;
}

impl<T> Sentinel for *mut T {
    fn sentinel() -> Self {
        std::ptr::null_mut()
    }
}

impl<T> Sentinel for *const T {
    fn sentinel() -> Self {
        std::ptr::null()
    }
}

macro_rules! zero_sentinel {
    ($($ty:ty),* $(,)?) => {
        $(impl Sentinel for $ty {
            fn sentinel() -> Self {
                0 as $ty
            }
        })*
    };
}

zero_sentinel!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl Sentinel for bool {
    fn sentinel() -> Self {
        false
    }
}

impl Sentinel for () {
    fn sentinel() -> Self {}
}

/// A reference-counted Slang interface whose vtable starts with
/// `ISlangUnknown`'s three slots.
///
/// # Safety
/// The implementing type must be `#[repr(C)]` with a single vtable pointer
/// whose pointee begins with `ISlangUnknownVtbl`.
pub unsafe trait ComInterface {
    /// Prefix of the flat exports for this interface
    const FAMILY: &'static str;
}

/// `Self`'s vtable embeds `P`'s vtable as its prefix.
///
/// # Safety
/// Only valid when the vtable layout really is an extension of `P`'s.
pub unsafe trait Inherits<P: ComInterface>: ComInterface {}

/// Views a derived interface pointer as its parent
#[inline]
pub fn upcast<T: Inherits<P>, P: ComInterface>(obj: *mut T) -> *mut P {
    obj.cast()
}

#[inline]
pub fn as_unknown<T: ComInterface>(obj: *mut T) -> *mut ISlangUnknown {
    obj.cast()
}

/// Reads the live reference out of a receiver slot.
///
/// Returns `None` without touching anything when the slot itself is null or
/// holds a null reference.
///
/// # Safety
/// A non-null `slot` must be readable.
#[inline]
pub unsafe fn receiver<T>(slot: *mut *mut T, op: &str) -> Option<*mut T> {
    if slot.is_null() {
        log::debug!("{op}: null receiver slot");
        return None;
    }
    let obj = unsafe { *slot };
    if obj.is_null() {
        log::debug!("{op}: receiver slot holds a null reference");
        return None;
    }
    Some(obj)
}

/// `addRef` through the `ISlangUnknown` prefix of any interface
///
/// # Safety
/// `slot` must be null or point at a null or live reference.
pub unsafe fn add_ref<T: ComInterface>(slot: *mut *mut T, op: &str) -> u32 {
    unsafe {
        let Some(obj) = receiver(slot, op) else {
            return 0;
        };
        debug_log!("[{}] this={:?}", op, obj);
        let unknown = as_unknown(obj);
        ((*(*unknown).vtable).addRef)(unknown)
    }
}

/// `release` through the `ISlangUnknown` prefix of any interface
///
/// The slot is not cleared; the caller owns it.
///
/// # Safety
/// `slot` must be null or point at a null or live reference.
pub unsafe fn release<T: ComInterface>(slot: *mut *mut T, op: &str) -> u32 {
    unsafe {
        let Some(obj) = receiver(slot, op) else {
            return 0;
        };
        debug_log!("[{}] this={:?}", op, obj);
        let unknown = as_unknown(obj);
        ((*(*unknown).vtable).release)(unknown)
    }
}
