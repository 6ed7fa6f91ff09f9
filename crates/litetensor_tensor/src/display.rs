use crate::Tensor;
use litetensor_core::dtype::{bf16, f16, DType, Element};
use std::fmt;

const MAX_ELEMENTS_PER_DIM: usize = 4;

fn format_value<T: fmt::Display>(value: &T, use_float_format: bool) -> String {
    if use_float_format {
        format!("{:.6}", value)
    } else {
        format!("{}", value)
    }
}

fn display_tensor_data<T: fmt::Display>(
    f: &mut fmt::Formatter<'_>,
    data: &[T],
    shape: &[usize],
    depth: usize,
    use_float_format: bool,
) -> fmt::Result {
    match shape.len() {
        0 => write!(f, "{}", format_value(&data[0], use_float_format)),
        1 => write!(f, "{}", format_flat(data, use_float_format)),
        _ => {
            let dim_size = shape[0];
            let sub_stride = data.len() / dim_size;
            let (show_start, show_end) = if dim_size <= MAX_ELEMENTS_PER_DIM * 2 {
                (dim_size, 0)
            } else {
                (MAX_ELEMENTS_PER_DIM, MAX_ELEMENTS_PER_DIM)
            };

            let separator = |f: &mut fmt::Formatter<'_>| {
                if depth < 2 {
                    write!(f, ",\n{}", " ".repeat(depth + 1))
                } else {
                    write!(f, ", ")
                }
            };

            write!(f, "[")?;
            for i in 0..show_start {
                if i > 0 {
                    separator(f)?;
                }
                let row = &data[i * sub_stride..(i + 1) * sub_stride];
                display_tensor_data(f, row, &shape[1..], depth + 1, use_float_format)?;
            }
            if show_end > 0 {
                separator(f)?;
                write!(f, "...")?;
                for i in (dim_size - show_end)..dim_size {
                    separator(f)?;
                    let row = &data[i * sub_stride..(i + 1) * sub_stride];
                    display_tensor_data(f, row, &shape[1..], depth + 1, use_float_format)?;
                }
            }
            write!(f, "]")
        },
    }
}

fn format_flat<T: fmt::Display>(data: &[T], use_float_format: bool) -> String {
    let len = data.len();
    let (show_start, show_end) = if len <= MAX_ELEMENTS_PER_DIM * 2 {
        (len, 0)
    } else {
        (MAX_ELEMENTS_PER_DIM, MAX_ELEMENTS_PER_DIM)
    };

    let mut parts: Vec<String> = data[..show_start]
        .iter()
        .map(|value| format_value(value, use_float_format))
        .collect();
    if show_end > 0 {
        parts.push("...".to_string());
        parts.extend(data[len - show_end..].iter().map(|value| format_value(value, use_float_format)));
    }
    format!("[{}]", parts.join(", "))
}

impl Tensor {
    fn write_data<T: Element>(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        let use_float_format = T::DTYPE.is_float();
        let data = match self.to_vec::<T>() {
            Ok(data) => data,
            Err(e) => return write!(f, "<{}>", e),
        };
        if !nested {
            return write!(f, "{}", format_flat(&data, use_float_format));
        }
        if data.is_empty() {
            return write!(f, "[]");
        }
        let shape: Vec<usize> = self.dims().iter().map(|&d| d as usize).collect();
        display_tensor_data(f, &data, &shape, 0, use_float_format)
    }

    fn write_data_by_dtype(&self, f: &mut fmt::Formatter<'_>, nested: bool) -> fmt::Result {
        let Some(dtype) = self.dtype() else {
            return write!(f, "<uninitialized>");
        };
        match dtype {
            DType::BF16 => self.write_data::<bf16>(f, nested),
            DType::F16 => self.write_data::<f16>(f, nested),
            DType::F32 => self.write_data::<f32>(f, nested),
            DType::F64 => self.write_data::<f64>(f, nested),
            DType::U8 => self.write_data::<u8>(f, nested),
            DType::U16 => self.write_data::<u16>(f, nested),
            DType::U32 => self.write_data::<u32>(f, nested),
            DType::U64 => self.write_data::<u64>(f, nested),
            DType::I8 => self.write_data::<i8>(f, nested),
            DType::I16 => self.write_data::<i16>(f, nested),
            DType::I32 => self.write_data::<i32>(f, nested),
            DType::I64 => self.write_data::<i64>(f, nested),
        }
    }
}

impl fmt::Display for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_data_by_dtype(f, true)
    }
}

impl fmt::Debug for Tensor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Tensor(dims={}, target={}", self.dims(), self.target().name())?;
        if !self.lod().is_empty() {
            write!(f, ", lod={}", self.lod())?;
        }
        match self.dtype() {
            Some(dtype) => write!(f, ", dtype={}", dtype.as_str())?,
            None => write!(f, ", dtype=none")?,
        }
        write!(f, ", data=")?;
        self.write_data_by_dtype(f, false)?;
        write!(f, ")")
    }
}
