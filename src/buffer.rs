/*!
Typed, aligned host buffers.

The evaluator stores whole lane groups at once, so the output has to start on
a boundary at least as wide as a lane group. `Vec<A>` only guarantees
`align_of::<A>()`, which is 4 bytes for `f32`. This module goes to the global
allocator with an explicit [`Layout`] instead.

The element type is bounded by [`bytemuck::Pod`]: a zeroed allocation is a
valid value of any `Zeroable` type, and `Pod` lets the buffer be viewed as
bytes without copying (e.g. to hand it to an image encoder or a GPU upload).
*/

use std::{
    alloc::{self, Layout},
    fmt,
    marker::PhantomData,
    mem::{align_of, size_of},
    ops::{Deref, DerefMut},
    ptr::NonNull,
    slice,
};

use log::trace;

use crate::error::{Error, Result};

pub struct AlignedBuffer<A> {
    ptr: NonNull<A>,
    len: usize,
    layout: Layout,
    phantom_data: PhantomData<A>,
}

// `AlignedBuffer` uniquely owns its allocation, like `Box<[A]>`.
unsafe impl<A: Send> Send for AlignedBuffer<A> {}
unsafe impl<A: Sync> Sync for AlignedBuffer<A> {}

impl<A: bytemuck::Pod + bytemuck::Zeroable> AlignedBuffer<A> {
    pub fn alignment(&self) -> usize {
        self.layout.align()
    }

    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice::<A, u8>(&self[..])
    }

    /// Copies the contents into a `Vec`, which only keeps `A`'s natural alignment.
    pub fn into_vec(self) -> Vec<A> {
        self.to_vec()
    }
}

impl<A> Deref for AlignedBuffer<A> {
    type Target = [A];

    fn deref(&self) -> &Self::Target {
        // SAFETY: `ptr` points to `len` initialised (zeroed `Pod`) elements owned by `self`.
        unsafe { slice::from_raw_parts(self.ptr.as_ptr(), self.len) }
    }
}

impl<A> DerefMut for AlignedBuffer<A> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        // SAFETY: as in `deref`, and `&mut self` guarantees unique access.
        unsafe { slice::from_raw_parts_mut(self.ptr.as_ptr(), self.len) }
    }
}

impl<A> Drop for AlignedBuffer<A> {
    fn drop(&mut self) {
        // SAFETY: allocated in `Builder::create` with exactly this layout.
        unsafe { alloc::dealloc(self.ptr.as_ptr().cast(), self.layout) }
    }
}

impl<A: fmt::Debug> fmt::Debug for AlignedBuffer<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AlignedBuffer")
            .field("len", &self.len)
            .field("align", &self.layout.align())
            .finish_non_exhaustive()
    }
}

pub struct Builder<'a, A> {
    label: Option<&'a str>,
    len: usize,
    alignment: usize,
    phantom_data: PhantomData<A>,
}

impl<'a, A: bytemuck::Pod + bytemuck::Zeroable> Builder<'a, A> {
    pub fn new(len: usize) -> Self {
        Self {
            label: None,
            len,
            alignment: align_of::<A>(),
            phantom_data: PhantomData,
        }
    }

    pub fn with_label(mut self, label: &'a str) -> Self {
        self.label = Some(label);
        self
    }

    /// Raises the alignment to `alignment` bytes. Never lowers it below `A`'s own.
    pub fn with_alignment(mut self, alignment: usize) -> Self {
        self.alignment = self.alignment.max(alignment);
        self
    }

    pub fn create(self) -> Result<AlignedBuffer<A>> {
        if self.len == 0 || size_of::<A>() == 0 {
            return Err(Error::InvalidArgument(
                "cannot allocate an empty buffer".to_string(),
            ));
        }

        let overflow = Error::Allocation {
            bytes: usize::MAX,
            align: self.alignment,
        };
        let bytes = self.len.checked_mul(size_of::<A>()).ok_or(overflow)?;
        let layout = Layout::from_size_align(bytes, self.alignment).map_err(|_| {
            Error::Allocation {
                bytes,
                align: self.alignment,
            }
        })?;

        trace!(
            "allocating {:?}: {} bytes aligned to {}",
            self.label,
            bytes,
            layout.align()
        );

        // SAFETY: `layout` has a non-zero size.
        let ptr = unsafe { alloc::alloc_zeroed(layout) };
        let ptr = NonNull::new(ptr.cast::<A>()).ok_or(Error::Allocation {
            bytes,
            align: layout.align(),
        })?;

        Ok(AlignedBuffer {
            ptr,
            len: self.len,
            layout,
            phantom_data: PhantomData,
        })
    }
}
