#![allow(non_snake_case)]

use std::ffi::{c_char, c_void, CStr};

/// `cudaEvent_t`
pub type CudaEventHandle = *mut c_void;
/// `cudaStream_t`; null is the legacy default stream.
pub type CudaStreamHandle = *mut c_void;

pub const CUDA_SUCCESS: i32 = 0;
pub const CUDA_ERROR_MEMORY_ALLOCATION: i32 = 2;
pub const CUDA_ERROR_NOT_READY: i32 = 600;

#[link(name = "cudart")]
extern "C" {
    fn cudaMalloc(ptr: *mut *mut c_void, size: usize) -> i32;
    fn cudaFree(ptr: *mut c_void) -> i32;
    fn cudaMemcpy(dst: *mut c_void, src: *const c_void, count: usize, kind: i32) -> i32;
    fn cudaGetErrorString(error: i32) -> *const c_char;
    fn cudaSetDevice(device: i32) -> i32;
    fn cudaGetDevice(device: *mut i32) -> i32;
    fn cudaEventCreate(event: *mut CudaEventHandle) -> i32;
    fn cudaEventRecord(event: CudaEventHandle, stream: CudaStreamHandle) -> i32;
    fn cudaEventQuery(event: CudaEventHandle) -> i32;
    fn cudaEventSynchronize(event: CudaEventHandle) -> i32;
    fn cudaEventDestroy(event: CudaEventHandle) -> i32;
}

/// # Safety
///
/// This function is unsafe because it dereferences raw pointers and requires:
/// * `ptr` must be valid for writes
/// * The allocated memory must be released with `cuda_free`
#[no_mangle]
pub unsafe extern "C" fn cuda_malloc(ptr: *mut *mut c_void, size: usize) -> i32 {
    cudaMalloc(ptr, size)
}

/// # Safety
///
/// This function is unsafe because it dereferences raw pointers and requires:
/// * `ptr` must have been allocated by `cuda_malloc`
/// * The pointer must not be used after being freed
#[no_mangle]
pub unsafe extern "C" fn cuda_free(ptr: *mut c_void) -> i32 {
    cudaFree(ptr)
}

/// # Safety
///
/// This function is unsafe because it dereferences raw pointers and requires:
/// * `dst` must be a valid CUDA device pointer allocated by `cuda_malloc`
/// * `src` must be a valid host pointer
/// * `size` must not exceed the allocated size of both buffers
/// * The memory regions must not overlap
#[no_mangle]
pub unsafe extern "C" fn cuda_memcpy_h2d(dst: *mut c_void, src: *const c_void, size: usize) -> i32 {
    cudaMemcpy(dst, src, size, 1) // cudaMemcpyHostToDevice = 1
}

/// # Safety
///
/// This function is unsafe because it dereferences raw pointers and requires:
/// * `dst` must be a valid host pointer
/// * `src` must be a valid CUDA device pointer allocated by `cuda_malloc`
/// * `size` must not exceed the allocated size of both buffers
/// * The memory regions must not overlap
#[no_mangle]
pub unsafe extern "C" fn cuda_memcpy_d2h(dst: *mut c_void, src: *const c_void, size: usize) -> i32 {
    cudaMemcpy(dst, src, size, 2) // cudaMemcpyDeviceToHost = 2
}

/// # Safety
///
/// This function is unsafe because it dereferences raw pointers and requires:
/// * Both `dst` and `src` must be valid CUDA device pointers allocated by `cuda_malloc`
/// * `size` must not exceed the allocated size of both buffers
/// * The memory regions must not overlap
#[no_mangle]
pub unsafe extern "C" fn cuda_memcpy_d2d(dst: *mut c_void, src: *const c_void, size: usize) -> i32 {
    cudaMemcpy(dst, src, size, 3) // cudaMemcpyDeviceToDevice = 3
}

/// Converts a CUDA error code into a human-readable string.
pub fn cuda_error(error_code: i32) -> String {
    unsafe {
        let c_str = cudaGetErrorString(error_code);
        if c_str.is_null() {
            format!("Unknown CUDA error: {}", error_code)
        } else {
            CStr::from_ptr(c_str).to_string_lossy().into_owned()
        }
    }
}

/// # Safety
///
/// This function sets the active CUDA device.
/// - `device_id` must be a valid device index.
#[no_mangle]
pub unsafe extern "C" fn cuda_set_device(device_id: i32) -> i32 {
    cudaSetDevice(device_id)
}

/// # Safety
///
/// This function gets the current active CUDA device.
#[no_mangle]
pub unsafe extern "C" fn cuda_get_device(device_id: *mut i32) -> i32 {
    cudaGetDevice(device_id)
}

/// # Safety
///
/// * `event` must be valid for writes
/// * The event must be released with `cuda_event_destroy`
#[no_mangle]
pub unsafe extern "C" fn cuda_event_create(event: *mut CudaEventHandle) -> i32 {
    cudaEventCreate(event)
}

/// # Safety
///
/// * `event` must have been created by `cuda_event_create` on the current device
/// * `stream` must be null or a live stream of the current device
#[no_mangle]
pub unsafe extern "C" fn cuda_event_record(event: CudaEventHandle, stream: CudaStreamHandle) -> i32 {
    cudaEventRecord(event, stream)
}

/// Returns `CUDA_SUCCESS` once the work captured by the event has completed and
/// `CUDA_ERROR_NOT_READY` while it is still pending.
///
/// # Safety
///
/// * `event` must have been created by `cuda_event_create`
#[no_mangle]
pub unsafe extern "C" fn cuda_event_query(event: CudaEventHandle) -> i32 {
    cudaEventQuery(event)
}

/// # Safety
///
/// * `event` must have been created by `cuda_event_create`
#[no_mangle]
pub unsafe extern "C" fn cuda_event_synchronize(event: CudaEventHandle) -> i32 {
    cudaEventSynchronize(event)
}

/// # Safety
///
/// * `event` must have been created by `cuda_event_create`
/// * The event must not be used after being destroyed
#[no_mangle]
pub unsafe extern "C" fn cuda_event_destroy(event: CudaEventHandle) -> i32 {
    cudaEventDestroy(event)
}
