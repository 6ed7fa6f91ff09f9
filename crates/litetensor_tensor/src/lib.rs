mod display;

use litetensor_core::{
    ddim::DDim,
    dtype::{DType, Element},
    error::{Error, Result},
    lod::LoD,
    storage::{Storage, StorageView, StorageViewMut},
    target::{get_default_target, Target},
};
use std::{mem, sync::Arc};
use tracing::trace;

/// A light-weight tensor: a shape, a level-of-detail table and a target, over a
/// storage handle that may be shared with other tensors.
///
/// Shape changes never touch storage. [`mutable_data`](Self::mutable_data) is
/// the only operation that allocates.
pub struct Tensor {
    target: Target,
    dims: DDim,
    lod: LoD,
    dtype: Option<DType>,
    storage: Arc<Storage>,
}

/// Cloning aliases: the clone shares the storage handle and copies shape,
/// target and LoD by value, like [`share_data_with`](Tensor::share_data_with).
/// Use [`copy_data_from`](Tensor::copy_data_from) for a deep copy.
impl Clone for Tensor {
    fn clone(&self) -> Self {
        Self {
            target: self.target,
            dims: self.dims.clone(),
            lod: self.lod.clone(),
            dtype: self.dtype,
            storage: Arc::clone(&self.storage),
        }
    }
}

impl Default for Tensor {
    fn default() -> Self {
        Self::new()
    }
}

impl Tensor {
    /// Creates an empty tensor on the default target with unbound storage.
    pub fn new() -> Self {
        Self::with_target(get_default_target())
    }

    pub fn with_target(target: Target) -> Self {
        Self {
            target,
            dims: DDim::default(),
            lod: LoD::default(),
            dtype: None,
            storage: Arc::new(Storage::new()),
        }
    }

    /// Creates a tensor of shape `dims` holding `data`, on the default target.
    pub fn from_vec<T: Element>(data: Vec<T>, dims: impl Into<DDim>) -> Result<Self> {
        Self::from_vec_on(data, dims, get_default_target())
    }

    pub fn from_vec_on<T: Element>(data: Vec<T>, dims: impl Into<DDim>, target: Target) -> Result<Self> {
        let dims = dims.into();
        let numel = dims.try_numel()?;
        if numel != data.len() {
            return Err(Error::InvalidShape {
                message: format!("shape {} holds {} elements, got {}", dims, numel, data.len()),
            });
        }

        let mut tensor = Self::with_target(target);
        tensor.resize(dims);
        tensor.mutable_data_ptr::<T>()?;
        tensor.storage.copy_from_slice(&data)?;
        Ok(tensor)
    }

    // metadata

    /// Sets the logical shape. Storage is left untouched until the next
    /// [`mutable_data`](Self::mutable_data).
    pub fn resize(&mut self, dims: impl Into<DDim>) {
        self.dims = dims.into();
    }

    pub fn dims(&self) -> &DDim {
        &self.dims
    }

    /// Element count of the shape, saturating at `usize::MAX` on overflow.
    /// Sizing and view operations reject such shapes with `InvalidShape`.
    pub fn numel(&self) -> usize {
        self.dims.numel()
    }

    pub fn lod(&self) -> &LoD {
        &self.lod
    }

    pub fn lod_mut(&mut self) -> &mut LoD {
        &mut self.lod
    }

    pub fn set_lod(&mut self, lod: impl Into<LoD>) {
        self.lod = lod.into();
    }

    pub fn target(&self) -> Target {
        self.target
    }

    /// Sets the target the next [`mutable_data`](Self::mutable_data) allocates on.
    pub fn set_target(&mut self, target: Target) {
        self.target = target;
    }

    /// Element type of the last [`mutable_data`](Self::mutable_data) request, if any.
    pub fn dtype(&self) -> Option<DType> {
        self.dtype
    }

    // storage

    pub fn is_initialized(&self) -> bool {
        self.storage.is_initialized()
    }

    /// Capacity of the bound storage in bytes.
    pub fn memory_size(&self) -> usize {
        self.storage.capacity()
    }

    /// Whether both tensors hold the same storage handle.
    pub fn is_shared_with(&self, other: &Tensor) -> bool {
        Arc::ptr_eq(&self.storage, &other.storage)
    }

    /// Number of tensors (and other referents) holding this storage handle.
    pub fn use_count(&self) -> usize {
        Arc::strong_count(&self.storage)
    }

    pub fn storage(&self) -> &Arc<Storage> {
        &self.storage
    }

    /// Typed read view over `numel()` elements. Never allocates.
    ///
    /// # Errors
    ///
    /// * `NotInitialized` when no storage is bound
    /// * `NotHostAccessible` when the storage lives on a device
    /// * `InsufficientCapacity` when the shape outgrew the storage
    /// * `BufferLocked` while a mutable view of the same storage is alive
    pub fn data<T: Element>(&self) -> Result<StorageView<'_, T>> {
        self.storage.view::<T>(self.dims.try_numel()?)
    }

    /// Ensures storage for `numel()` elements of `T` on this tensor's target,
    /// then returns a typed mutable view.
    ///
    /// Storage is (re)allocated only when unbound, on another target, or too
    /// small; a reallocation does not preserve previous contents.
    ///
    /// # Errors
    ///
    /// * `OutOfMemory` / `AllocationFailed` when the target cannot provide the bytes
    /// * `NotHostAccessible` when the target is a device; use
    ///   [`mutable_data_ptr`](Self::mutable_data_ptr) there
    /// * `BufferLocked` while another view of the same storage is alive
    pub fn mutable_data<T: Element>(&mut self) -> Result<StorageViewMut<'_, T>> {
        self.reserve::<T>()?;
        self.storage.view_mut::<T>(self.dims.try_numel()?)
    }

    /// Raw pointer counterpart of [`data`](Self::data), valid on any target.
    pub fn data_ptr<T: Element>(&self) -> Result<*const T> {
        self.storage.data_ptr::<T>(self.dims.try_numel()?)
    }

    /// Raw pointer counterpart of [`mutable_data`](Self::mutable_data), valid on
    /// any target. Allocates like `mutable_data`.
    pub fn mutable_data_ptr<T: Element>(&mut self) -> Result<*mut T> {
        self.reserve::<T>()?;
        self.storage.mutable_data_ptr::<T>(self.dims.try_numel()?)
    }

    fn reserve<T: Element>(&mut self) -> Result<()> {
        let size_in_bytes = self
            .dims
            .try_numel()?
            .checked_mul(mem::size_of::<T>())
            .ok_or_else(|| Error::InvalidArgument("Overflow in allocation".into()))?;
        self.storage.reset_lazy(self.target, size_in_bytes)?;
        self.dtype = Some(T::DTYPE);
        Ok(())
    }

    /// Copies `numel()` elements to a host vector, whichever target holds them.
    pub fn to_vec<T: Element>(&self) -> Result<Vec<T>> {
        self.storage.to_vec::<T>(self.dims.try_numel()?)
    }

    // aliasing

    /// Makes this tensor an alias of `other`: the storage handle is shared and
    /// shape, target and LoD are copied by value.
    ///
    /// Writes through either tensor are visible through the other. Later
    /// metadata changes (a `resize`, a LoD edit) stay local.
    pub fn share_data_with(&mut self, other: &Tensor) {
        self.storage = Arc::clone(&other.storage);
        self.dims = other.dims.clone();
        self.target = other.target;
        self.lod = other.lod.clone();
        self.dtype = other.dtype;
        trace!(use_count = self.use_count(), "shared tensor storage");
    }

    /// Deep-copies `other` into this tensor's own storage handle and copies
    /// shape, target and LoD by value.
    ///
    /// The copy adopts the source's target and capacity. Aliases of this
    /// tensor observe the new contents; `other` stays independent. Copying from
    /// a tensor that already shares this storage copies metadata only.
    ///
    /// # Errors
    ///
    /// * `NotInitialized` when `other` has no storage bound; nothing is changed
    /// * allocation and copy failures from the target backend
    pub fn copy_data_from(&mut self, other: &Tensor) -> Result<()> {
        self.storage.copy_from(&other.storage)?;
        self.dims = other.dims.clone();
        self.target = other.target;
        self.lod = other.lod.clone();
        self.dtype = other.dtype;
        Ok(())
    }
}
