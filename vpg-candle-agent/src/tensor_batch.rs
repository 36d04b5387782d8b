use candle_core::{Device, Tensor};
use vpg_core::generic_episode_buffer::BatchBase;

/// A column of transitions backed by a [`Tensor`].
///
/// The internal buffer is allocated lazily, with the shape
/// `[capacity, data.dims()[1..]]` of the first pushed data.
///
/// [`Tensor`]: https://docs.rs/candle-core/0.8.4/candle_core/struct.Tensor.html
#[derive(Clone, Debug)]
pub struct TensorBatch {
    buf: Option<Tensor>,
    capacity: usize,
}

impl TensorBatch {
    /// Creates a batch of the rows of the given tensor.
    pub fn from_tensor(t: Tensor) -> Self {
        let capacity = t.dims()[0] as _;
        Self {
            buf: Some(t),
            capacity,
        }
    }

    /// Moves the internal buffer to the given device.
    pub fn to(&mut self, device: &Device) -> candle_core::error::Result<()> {
        if let Some(buf) = &self.buf {
            self.buf = Some(buf.to_device(device)?);
        }
        Ok(())
    }
}

impl BatchBase for TensorBatch {
    fn new(capacity: usize) -> Self {
        Self {
            buf: None,
            capacity,
        }
    }

    fn push(&mut self, index: usize, data: Self) {
        if data.buf.is_none() {
            return;
        }

        let data = data.buf.unwrap();
        let batch_size = data.dims()[0];
        if batch_size == 0 {
            return;
        }
        assert!(index + batch_size <= self.capacity);

        if self.buf.is_none() {
            let mut shape = data.dims().to_vec();
            shape[0] = self.capacity;
            let dtype = data.dtype();
            self.buf = Some(Tensor::zeros(shape, dtype, &Device::Cpu).unwrap());
        }

        self.buf
            .as_mut()
            .unwrap()
            .slice_set(&data, 0, index)
            .unwrap();
    }

    fn sample(&self, ixs: &Vec<usize>) -> Self {
        let capacity = ixs.len();
        let ixs = {
            let device = self.buf.as_ref().unwrap().device();
            let ixs = ixs.iter().map(|x| *x as u32).collect();
            Tensor::from_vec(ixs, &[capacity], device).unwrap()
        };
        let buf = Some(self.buf.as_ref().unwrap().index_select(&ixs, 0).unwrap());
        Self { buf, capacity }
    }
}

impl From<TensorBatch> for Tensor {
    fn from(b: TensorBatch) -> Self {
        b.buf.unwrap()
    }
}
