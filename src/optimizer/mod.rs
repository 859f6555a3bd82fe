//! Gradient-descent optimizers for the Q-network.
//!
//! Each optimizer keeps its moment estimates per layer, indexed by the
//! layer's position in the network, and allocates them lazily on the first
//! update so it can be built before the network it will drive.

use ndarray::{Array1, Array2, ArrayBase, Dimension, OwnedRepr};
use serde::{Serialize, Deserialize};

pub trait Optimizer {
    /// Called once per optimization step, before any parameter update.
    fn begin_step(&mut self) {}

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>);

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>);

    fn learning_rate(&self) -> f32;
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub enum OptimizerWrapper {
    SGD(SGD),
    Adam(Adam),
    RMSProp(RMSProp),
}

impl Optimizer for OptimizerWrapper {
    fn begin_step(&mut self) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::Adam(optimizer) => optimizer.begin_step(),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.begin_step(),
        }
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_weights(layer, weights, gradients),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_weights(layer, weights, gradients),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.update_weights(layer, weights, gradients),
        }
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>) {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.update_biases(layer, biases, gradients),
            OptimizerWrapper::Adam(optimizer) => optimizer.update_biases(layer, biases, gradients),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.update_biases(layer, biases, gradients),
        }
    }

    fn learning_rate(&self) -> f32 {
        match self {
            OptimizerWrapper::SGD(optimizer) => optimizer.learning_rate(),
            OptimizerWrapper::Adam(optimizer) => optimizer.learning_rate(),
            OptimizerWrapper::RMSProp(optimizer) => optimizer.learning_rate(),
        }
    }
}

type Owned<D> = ArrayBase<OwnedRepr<f32>, D>;

/// Per-layer state slot, created as zeros shaped like the parameter.
fn slot<'a, D: Dimension>(
    slots: &'a mut Vec<Option<Owned<D>>>,
    layer: usize,
    like: &Owned<D>,
) -> &'a mut Owned<D> {
    if slots.len() <= layer {
        slots.resize(layer + 1, None);
    }
    let entry = &mut slots[layer];
    if entry.as_ref().map_or(false, |s| s.raw_dim() != like.raw_dim()) {
        *entry = None;
    }
    entry.get_or_insert_with(|| Owned::<D>::zeros(like.raw_dim()))
}

/// Plain stochastic gradient descent.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SGD {
    pub learning_rate: f32,
}

impl SGD {
    pub fn new(learning_rate: f32) -> SGD {
        SGD { learning_rate }
    }
}

impl Default for SGD {
    fn default() -> Self {
        Self::new(0.01)
    }
}

impl Optimizer for SGD {
    fn update_weights(&mut self, _layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>) {
        let lr = self.learning_rate;
        weights.zip_mut_with(gradients, |w, &g| *w -= lr * g);
    }

    fn update_biases(&mut self, _layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>) {
        let lr = self.learning_rate;
        biases.zip_mut_with(gradients, |b, &g| *b -= lr * g);
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

/// Adam with bias-corrected first and second moments.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct Adam {
    pub learning_rate: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    m_weights: Vec<Option<Array2<f32>>>,
    v_weights: Vec<Option<Array2<f32>>>,
    m_biases: Vec<Option<Array1<f32>>>,
    v_biases: Vec<Option<Array1<f32>>>,
    pub t: u32,
}

impl Adam {
    pub fn new(learning_rate: f32, beta1: f32, beta2: f32, epsilon: f32) -> Self {
        Adam {
            learning_rate,
            beta1,
            beta2,
            epsilon,
            m_weights: Vec::new(),
            v_weights: Vec::new(),
            m_biases: Vec::new(),
            v_biases: Vec::new(),
            t: 0,
        }
    }

    fn adam_update<D: Dimension>(
        &(lr, b1, b2, eps): &(f32, f32, f32, f32),
        t: u32,
        m: &mut Owned<D>,
        v: &mut Owned<D>,
        params: &mut Owned<D>,
        gradients: &Owned<D>,
    ) {
        m.zip_mut_with(gradients, |m, &g| *m = b1 * *m + (1.0 - b1) * g);
        v.zip_mut_with(gradients, |v, &g| *v = b2 * *v + (1.0 - b2) * g * g);

        let t = t.max(1) as i32;
        let m_correction = 1.0 - b1.powi(t);
        let v_correction = 1.0 - b2.powi(t);
        ndarray::Zip::from(params)
            .and(&*m)
            .and(&*v)
            .for_each(|p, &m, &v| {
                let m_hat = m / m_correction;
                let v_hat = v / v_correction;
                *p -= lr * m_hat / (v_hat.sqrt() + eps);
            });
    }

    fn hyper(&self) -> (f32, f32, f32, f32) {
        (self.learning_rate, self.beta1, self.beta2, self.epsilon)
    }
}

impl Default for Adam {
    fn default() -> Self {
        Self::new(0.001, 0.9, 0.999, 1e-8)
    }
}

impl Optimizer for Adam {
    fn begin_step(&mut self) {
        self.t += 1;
    }

    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>) {
        let (hyper, t) = (self.hyper(), self.t);
        let m = slot(&mut self.m_weights, layer, weights);
        let v = slot(&mut self.v_weights, layer, weights);
        Self::adam_update(&hyper, t, m, v, weights, gradients);
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>) {
        let (hyper, t) = (self.hyper(), self.t);
        let m = slot(&mut self.m_biases, layer, biases);
        let v = slot(&mut self.v_biases, layer, biases);
        Self::adam_update(&hyper, t, m, v, biases, gradients);
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}

/// RMSProp: `v = alpha * v + (1 - alpha) * g^2`, `p -= lr * g / (sqrt(v) + eps)`.
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct RMSProp {
    pub learning_rate: f32,
    pub alpha: f32,
    pub epsilon: f32,
    v_weights: Vec<Option<Array2<f32>>>,
    v_biases: Vec<Option<Array1<f32>>>,
}

impl RMSProp {
    pub fn new(learning_rate: f32, alpha: f32, epsilon: f32) -> Self {
        RMSProp {
            learning_rate,
            alpha,
            epsilon,
            v_weights: Vec::new(),
            v_biases: Vec::new(),
        }
    }

    fn rms_update<D: Dimension>(
        lr: f32,
        alpha: f32,
        eps: f32,
        v: &mut Owned<D>,
        params: &mut Owned<D>,
        gradients: &Owned<D>,
    ) {
        v.zip_mut_with(gradients, |v, &g| *v = alpha * *v + (1.0 - alpha) * g * g);
        ndarray::Zip::from(params)
            .and(gradients)
            .and(&*v)
            .for_each(|p, &g, &v| *p -= lr * g / (v.sqrt() + eps));
    }
}

impl Default for RMSProp {
    fn default() -> Self {
        Self::new(0.01, 0.99, 1e-8)
    }
}

impl Optimizer for RMSProp {
    fn update_weights(&mut self, layer: usize, weights: &mut Array2<f32>, gradients: &Array2<f32>) {
        let (lr, alpha, eps) = (self.learning_rate, self.alpha, self.epsilon);
        let v = slot(&mut self.v_weights, layer, weights);
        Self::rms_update(lr, alpha, eps, v, weights, gradients);
    }

    fn update_biases(&mut self, layer: usize, biases: &mut Array1<f32>, gradients: &Array1<f32>) {
        let (lr, alpha, eps) = (self.learning_rate, self.alpha, self.epsilon);
        let v = slot(&mut self.v_biases, layer, biases);
        Self::rms_update(lr, alpha, eps, v, biases, gradients);
    }

    fn learning_rate(&self) -> f32 {
        self.learning_rate
    }
}
