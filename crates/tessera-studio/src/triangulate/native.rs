//! Adapter for a natively compiled triangulation module.
//!
//! Native modules hand out collections that must be released explicitly.
//! [`Scoped`] ties that release to scope exit so every path, including
//! early error returns, gives the memory back.

use std::ops::{Deref, DerefMut};

use super::{Method, RawMesh, TransportError, Triangulator};

/// Memory owned by a native module.
pub trait Release {
    fn release(&mut self);
}

/// Releases the wrapped value when dropped.
pub struct Scoped<T: Release>(T);

impl<T: Release> Scoped<T> {
    pub fn new(value: T) -> Self {
        Self(value)
    }
}

impl<T: Release> Deref for Scoped<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T: Release> DerefMut for Scoped<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: Release> Drop for Scoped<T> {
    fn drop(&mut self) {
        self.0.release();
    }
}

pub trait PointCollection: Release {
    fn push_back(&mut self, x: f64, y: f64);
}

pub trait IndexCollection: Release {
    fn size(&self) -> usize;
    fn get(&self, i: usize) -> Option<u32>;
}

/// Entry points exposed by a native triangulation module.
pub trait NativeModule: Send {
    type Points: PointCollection;
    type Indices: IndexCollection;

    fn new_points(&self) -> Result<Self::Points, String>;

    fn triangulate(&self, points: &Self::Points) -> Result<Self::Indices, String>;
}

/// [`Triangulator`] over a loaded [`NativeModule`].
pub struct NativeTriangulator<M> {
    module: M,
}

impl<M: NativeModule> NativeTriangulator<M> {
    pub fn new(module: M) -> Self {
        Self { module }
    }
}

impl<M: NativeModule> Triangulator for NativeTriangulator<M> {
    fn method(&self) -> Method {
        Method::Native
    }

    fn triangulate(&self, points: &[[f64; 2]]) -> Result<RawMesh, TransportError> {
        let mut input = Scoped::new(self.module.new_points().map_err(TransportError::Native)?);
        for &[x, y] in points {
            input.push_back(x, y);
        }

        let output = Scoped::new(self.module.triangulate(&input).map_err(TransportError::Native)?);

        let indices = (0..output.size())
            .map(|i| {
                output
                    .get(i)
                    .ok_or_else(|| TransportError::Native(format!("index {i} out of range")))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(RawMesh { indices, vertices: None })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    #[derive(Default)]
    struct Releases {
        points: AtomicU32,
        indices: AtomicU32,
    }

    impl Releases {
        fn counts(&self) -> (u32, u32) {
            (self.points.load(Ordering::SeqCst), self.indices.load(Ordering::SeqCst))
        }
    }

    struct FakePoints {
        xy: Vec<(f64, f64)>,
        log: Arc<Releases>,
    }

    impl Release for FakePoints {
        fn release(&mut self) {
            self.log.points.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl PointCollection for FakePoints {
        fn push_back(&mut self, x: f64, y: f64) {
            self.xy.push((x, y));
        }
    }

    struct FakeIndices {
        data: Vec<u32>,
        // Reported size; larger than `data` to simulate a broken module.
        size: usize,
        log: Arc<Releases>,
    }

    impl Release for FakeIndices {
        fn release(&mut self) {
            self.log.indices.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl IndexCollection for FakeIndices {
        fn size(&self) -> usize {
            self.size
        }

        fn get(&self, i: usize) -> Option<u32> {
            self.data.get(i).copied()
        }
    }

    /// Fans the input polygon from its first point.
    struct FanModule {
        log: Arc<Releases>,
        fail: bool,
        overreport: usize,
    }

    impl FanModule {
        fn new(log: &Arc<Releases>) -> Self {
            Self { log: Arc::clone(log), fail: false, overreport: 0 }
        }
    }

    impl NativeModule for FanModule {
        type Points = FakePoints;
        type Indices = FakeIndices;

        fn new_points(&self) -> Result<FakePoints, String> {
            Ok(FakePoints { xy: Vec::new(), log: Arc::clone(&self.log) })
        }

        fn triangulate(&self, points: &FakePoints) -> Result<FakeIndices, String> {
            if self.fail {
                return Err("degenerate polygon".into());
            }
            let n = points.xy.len() as u32;
            let data: Vec<u32> = (1..n.saturating_sub(1)).flat_map(|i| [0, i, i + 1]).collect();
            Ok(FakeIndices {
                size: data.len() + self.overreport,
                data,
                log: Arc::clone(&self.log),
            })
        }
    }

    #[test]
    fn triangulates_and_releases_both_collections() {
        let log = Arc::new(Releases::default());
        let t = NativeTriangulator::new(FanModule::new(&log));
        assert_eq!(t.method(), Method::Native);

        let mesh = t.triangulate(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]]).unwrap();
        assert_eq!(mesh.indices, vec![0, 1, 2, 0, 2, 3]);
        assert!(mesh.vertices.is_none());
        assert_eq!(log.counts(), (1, 1));
    }

    #[test]
    fn module_failure_still_releases_points() {
        let log = Arc::new(Releases::default());
        let mut module = FanModule::new(&log);
        module.fail = true;

        let err = NativeTriangulator::new(module).triangulate(&[[0.0, 0.0]]).unwrap_err();
        assert_eq!(err, TransportError::Native("degenerate polygon".into()));
        assert_eq!(log.counts(), (1, 0));
    }

    #[test]
    fn short_index_collection_is_an_error_and_released() {
        let log = Arc::new(Releases::default());
        let mut module = FanModule::new(&log);
        module.overreport = 2;

        let err = NativeTriangulator::new(module)
            .triangulate(&[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]])
            .unwrap_err();
        assert!(matches!(err, TransportError::Native(_)));
        assert_eq!(log.counts(), (1, 1));
    }
}
