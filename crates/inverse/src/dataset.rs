//! Beam problem data stored in an HDF5 file or a NumPy `.npz` archive.
//!
//! Datasets are named after their group path in the container:
//!
//! | name | shape |
//! |---|---|
//! | `ForwardModel/NodeLocations` | (1, N), (N,) or (N, 1) |
//! | `ForwardModel/SystemMatrix` | (N, N) |
//! | `Observations/ObservationMatrix` | (M, N) |
//! | `Observations/ObservationData` | (M,), (1, M) or (M, 1) |
//! | `Observations/LoadSum` | one value |
//!
//! A leading `/` and the `.npy` suffix of archive entries are ignored when
//! looking datasets up.
//!
//! HDF5 support requires the `hdf5` feature.

use crate::errors::{InverseError, Result};
use log::{debug, info, warn};
use ndarray::{array, Array1, Array2, ArrayD, Axis, Ix2};
use ndarray_npy::{NpzReader, NpzWriter};
use std::fs::File;
use std::io::{BufReader, Read, Seek, Write};
use std::path::Path;

/// Finite difference node locations dataset name
pub const NODE_LOCATIONS: &str = "ForwardModel/NodeLocations";
/// Finite difference system matrix dataset name
pub const SYSTEM_MATRIX: &str = "ForwardModel/SystemMatrix";
/// Selection matrix of observed nodes dataset name
pub const OBSERVATION_MATRIX: &str = "Observations/ObservationMatrix";
/// Observed deflections dataset name
pub const OBSERVATION_DATA: &str = "Observations/ObservationData";
/// Observed total load dataset name
pub const LOAD_SUM: &str = "Observations/LoadSum";

/// Inputs of the beam load inversion: the discretized forward model and the observations.
#[derive(Clone, Debug, PartialEq)]
pub struct BeamDataset {
    nodes: Array1<f64>,
    system_matrix: Array2<f64>,
    observation_matrix: Array2<f64>,
    observation_data: Array1<f64>,
    load_sum: f64,
}

impl BeamDataset {
    /// Constructor checking shapes consistency and values finiteness.
    ///
    /// `system_matrix` invertibility is not checked here but when building
    /// the [`ForwardOperator`](crate::ForwardOperator).
    pub fn new(
        nodes: Array1<f64>,
        system_matrix: Array2<f64>,
        observation_matrix: Array2<f64>,
        observation_data: Array1<f64>,
        load_sum: f64,
    ) -> Result<Self> {
        let n = nodes.len();
        if n == 0 {
            return Err(InverseError::invalid(NODE_LOCATIONS, "no node given"));
        }
        if system_matrix.dim() != (n, n) {
            return Err(InverseError::invalid(
                SYSTEM_MATRIX,
                format!("shape {:?} does not match {} nodes", system_matrix.dim(), n),
            ));
        }
        if observation_matrix.ncols() != n {
            return Err(InverseError::invalid(
                OBSERVATION_MATRIX,
                format!(
                    "shape {:?} does not match {} nodes",
                    observation_matrix.dim(),
                    n
                ),
            ));
        }
        if observation_data.len() != observation_matrix.nrows() {
            return Err(InverseError::invalid(
                OBSERVATION_DATA,
                format!(
                    "{} values for {} observation matrix rows",
                    observation_data.len(),
                    observation_matrix.nrows()
                ),
            ));
        }
        for (name, finite) in [
            (NODE_LOCATIONS, nodes.iter().all(|v| v.is_finite())),
            (SYSTEM_MATRIX, system_matrix.iter().all(|v| v.is_finite())),
            (
                OBSERVATION_MATRIX,
                observation_matrix.iter().all(|v| v.is_finite()),
            ),
            (
                OBSERVATION_DATA,
                observation_data.iter().all(|v| v.is_finite()),
            ),
            (LOAD_SUM, load_sum.is_finite()),
        ] {
            if !finite {
                return Err(InverseError::invalid(name, "non finite values"));
            }
        }
        if observation_matrix.iter().any(|v| *v != 0. && *v != 1.) {
            warn!("{} is not a 0/1 selection matrix", OBSERVATION_MATRIX);
        }
        Ok(BeamDataset {
            nodes,
            system_matrix,
            observation_matrix,
            observation_data,
            load_sum,
        })
    }

    /// Load datasets from `path`, the container format being chosen from the file extension:
    /// `.h5`, `.hdf5` or `.he5` for HDF5, `.npz` for a NumPy archive.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let ext = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase());
        match ext.as_deref() {
            Some("h5" | "hdf5" | "he5") => Self::load_hdf5(path),
            Some("npz") => Self::from_npz(path),
            _ => Err(InverseError::UnsupportedFormat(format!(
                "{} (expected .h5, .hdf5 or .npz)",
                path.display()
            ))),
        }
    }

    #[cfg(feature = "hdf5")]
    fn load_hdf5(path: &Path) -> Result<Self> {
        Self::from_hdf5(path)
    }

    #[cfg(not(feature = "hdf5"))]
    fn load_hdf5(path: &Path) -> Result<Self> {
        Err(InverseError::UnsupportedFormat(format!(
            "{} (HDF5 support requires the `hdf5` feature)",
            path.display()
        )))
    }

    /// Load datasets from the HDF5 file at `path`
    #[cfg(feature = "hdf5")]
    pub fn from_hdf5<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Load beam data from {}", path.display());
        let file = hdf5::File::open(path)?;
        Self::assemble(|name| {
            let link = format!("/{}", name);
            if !file.link_exists(&link) {
                return Err(InverseError::MissingDataset(name.to_string()));
            }
            Ok(file.dataset(&link)?.read_dyn::<f64>()?)
        })
    }

    /// Save datasets in an HDF5 file at `path`, the load sum being stored as a one value vector
    #[cfg(feature = "hdf5")]
    pub fn save_hdf5<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = hdf5::File::create(path.as_ref())?;
        let load_sum = array![self.load_sum];
        let datasets = [
            (NODE_LOCATIONS, self.nodes.view().into_dyn()),
            (SYSTEM_MATRIX, self.system_matrix.view().into_dyn()),
            (OBSERVATION_MATRIX, self.observation_matrix.view().into_dyn()),
            (OBSERVATION_DATA, self.observation_data.view().into_dyn()),
            (LOAD_SUM, load_sum.view().into_dyn()),
        ];
        for (name, values) in datasets {
            let (group, dataset) = name.rsplit_once('/').unwrap_or(("/", name));
            let group = if file.link_exists(group) {
                file.group(group)?
            } else {
                file.create_group(group)?
            };
            let builder = group.new_dataset_builder().with_data(values);
            builder.create(dataset)?;
        }
        file.flush()?;
        Ok(())
    }

    /// Load datasets from the `.npz` archive at `path`
    pub fn from_npz<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Load beam data from {}", path.display());
        let mut npz = NpzReader::new(BufReader::new(File::open(path)?))?;
        Self::read(&mut npz)
    }

    /// Read datasets from an opened `.npz` archive
    pub fn read<R: Read + Seek>(npz: &mut NpzReader<R>) -> Result<Self> {
        let names = npz.names()?;
        debug!("Archive entries: {:?}", names);
        Self::assemble(|name| read_entry(npz, &names, name))
    }

    /// Build the dataset from raw arrays fetched by name
    fn assemble<G>(mut get: G) -> Result<Self>
    where
        G: FnMut(&str) -> Result<ArrayD<f64>>,
    {
        let nodes = into_vector(NODE_LOCATIONS, get(NODE_LOCATIONS)?)?;
        let system_matrix = into_matrix(SYSTEM_MATRIX, get(SYSTEM_MATRIX)?)?;
        let observation_matrix = into_matrix(OBSERVATION_MATRIX, get(OBSERVATION_MATRIX)?)?;
        let observation_data = into_vector(OBSERVATION_DATA, get(OBSERVATION_DATA)?)?;
        let load_sum = into_vector(LOAD_SUM, get(LOAD_SUM)?)?;
        if load_sum.len() != 1 {
            return Err(InverseError::invalid(
                LOAD_SUM,
                format!("expected one value, got {}", load_sum.len()),
            ));
        }
        let dataset = Self::new(
            nodes,
            system_matrix,
            observation_matrix,
            observation_data,
            load_sum[0],
        )?;
        info!(
            "Beam data: {} nodes, {} observations, load sum {}",
            dataset.n_nodes(),
            dataset.n_observations(),
            dataset.load_sum
        );
        Ok(dataset)
    }

    /// Save datasets in a `.npz` archive at `path`
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let file = File::create(path.as_ref())?;
        let file = self.write(NpzWriter::new(file))?;
        file.sync_all()?;
        Ok(())
    }

    /// Write datasets in the given archive writer, returning the underlying writer
    pub fn write<W: Write + Seek>(&self, mut npz: NpzWriter<W>) -> Result<W> {
        npz.add_array(NODE_LOCATIONS, &self.nodes.view().insert_axis(Axis(0)))?;
        npz.add_array(SYSTEM_MATRIX, &self.system_matrix)?;
        npz.add_array(OBSERVATION_MATRIX, &self.observation_matrix)?;
        npz.add_array(OBSERVATION_DATA, &self.observation_data)?;
        npz.add_array(LOAD_SUM, &array![self.load_sum])?;
        Ok(npz.finish()?)
    }

    /// Number of finite difference nodes N
    pub fn n_nodes(&self) -> usize {
        self.nodes.len()
    }

    /// Number of observed deflections M
    pub fn n_observations(&self) -> usize {
        self.observation_data.len()
    }

    /// Node locations (N,)
    pub fn nodes(&self) -> &Array1<f64> {
        &self.nodes
    }

    /// System matrix K (N, N)
    pub fn system_matrix(&self) -> &Array2<f64> {
        &self.system_matrix
    }

    /// Selection matrix B (M, N)
    pub fn observation_matrix(&self) -> &Array2<f64> {
        &self.observation_matrix
    }

    /// Observed deflections y (M,)
    pub fn observation_data(&self) -> &Array1<f64> {
        &self.observation_data
    }

    /// Observed total load
    pub fn load_sum(&self) -> f64 {
        self.load_sum
    }
}

fn read_entry<R: Read + Seek>(
    npz: &mut NpzReader<R>,
    names: &[String],
    name: &str,
) -> Result<ArrayD<f64>> {
    let entry = names
        .iter()
        .find(|entry| entry.trim_start_matches('/').trim_end_matches(".npy") == name)
        .ok_or_else(|| InverseError::MissingDataset(name.to_string()))?;
    Ok(npz.by_name(entry)?)
}

fn into_vector(name: &str, values: ArrayD<f64>) -> Result<Array1<f64>> {
    match values.shape() {
        [_] | [1, _] | [_, 1] => Ok(values.iter().cloned().collect()),
        [] => Ok(array![values.iter().cloned().sum::<f64>()]),
        shape => Err(InverseError::invalid(
            name,
            format!("expected a vector, got shape {:?}", shape),
        )),
    }
}

fn into_matrix(name: &str, values: ArrayD<f64>) -> Result<Array2<f64>> {
    let shape = values.shape().to_vec();
    values.into_dimensionality::<Ix2>().map_err(|_| {
        InverseError::invalid(name, format!("expected a matrix, got shape {:?}", shape))
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use ndarray::Array;

    const OUTDIR: &str = "target/tests";

    fn beam5() -> BeamDataset {
        BeamDataset::new(
            Array::linspace(0., 4., 5),
            Array2::eye(5),
            array![[0., 1., 0., 0., 0.], [0., 0., 0., 1., 0.]],
            array![0.1, -0.2],
            1.,
        )
        .unwrap()
    }

    #[test]
    fn test_save_load() {
        std::fs::create_dir_all(OUTDIR).unwrap();
        let path = format!("{OUTDIR}/beam5.npz");
        let data = beam5();
        data.save(&path).unwrap();
        let loaded = BeamDataset::from_npz(&path).unwrap();
        assert_eq!(loaded, data);
    }

    #[test]
    fn test_vector_layouts() {
        std::fs::create_dir_all(OUTDIR).unwrap();
        let path = format!("{OUTDIR}/beam3_columns.npz");
        let mut npz = NpzWriter::new(File::create(&path).unwrap());
        npz.add_array(NODE_LOCATIONS, &array![[0.], [0.5], [1.]]).unwrap();
        npz.add_array(SYSTEM_MATRIX, &Array2::<f64>::eye(3)).unwrap();
        npz.add_array(OBSERVATION_MATRIX, &array![[1., 0., 0.]]).unwrap();
        npz.add_array(OBSERVATION_DATA, &array![[0.3]]).unwrap();
        npz.add_array(LOAD_SUM, &array![[2.]]).unwrap();
        npz.finish().unwrap();

        let data = BeamDataset::from_npz(&path).unwrap();
        assert_abs_diff_eq!(data.nodes(), &array![0., 0.5, 1.]);
        assert_abs_diff_eq!(data.observation_data(), &array![0.3]);
        assert_abs_diff_eq!(data.load_sum(), 2.);
        assert_eq!(data.n_nodes(), 3);
        assert_eq!(data.n_observations(), 1);
    }

    #[test]
    fn test_missing_dataset() {
        std::fs::create_dir_all(OUTDIR).unwrap();
        let path = format!("{OUTDIR}/beam_no_loadsum.npz");
        let data = beam5();
        let mut npz = NpzWriter::new(File::create(&path).unwrap());
        npz.add_array(NODE_LOCATIONS, data.nodes()).unwrap();
        npz.add_array(SYSTEM_MATRIX, data.system_matrix()).unwrap();
        npz.add_array(OBSERVATION_MATRIX, data.observation_matrix()).unwrap();
        npz.add_array(OBSERVATION_DATA, data.observation_data()).unwrap();
        npz.finish().unwrap();

        match BeamDataset::from_npz(&path) {
            Err(InverseError::MissingDataset(name)) => assert_eq!(name, LOAD_SUM),
            res => panic!("unexpected result {:?}", res),
        }
    }

    #[test]
    fn test_from_file_format() {
        std::fs::create_dir_all(OUTDIR).unwrap();
        let path = format!("{OUTDIR}/beam5_any.npz");
        let data = beam5();
        data.save(&path).unwrap();
        assert_eq!(BeamDataset::from_file(&path).unwrap(), data);

        let res = BeamDataset::from_file(format!("{OUTDIR}/beam5.csv"));
        assert!(matches!(res, Err(InverseError::UnsupportedFormat(_))));
        let res = BeamDataset::from_file(format!("{OUTDIR}/beam5"));
        assert!(matches!(res, Err(InverseError::UnsupportedFormat(_))));
    }

    #[cfg(not(feature = "hdf5"))]
    #[test]
    fn test_hdf5_disabled() {
        let res = BeamDataset::from_file(format!("{OUTDIR}/beam5.h5"));
        assert!(matches!(res, Err(InverseError::UnsupportedFormat(_))));
    }

    #[cfg(feature = "hdf5")]
    fn add_dataset<D: ndarray::Dimension>(group: &hdf5::Group, name: &str, values: &Array<f64, D>) {
        let builder = group.new_dataset_builder().with_data(values);
        builder.create(name).unwrap();
    }

    #[cfg(feature = "hdf5")]
    #[test]
    fn test_save_load_hdf5() {
        std::fs::create_dir_all(OUTDIR).unwrap();
        let path = format!("{OUTDIR}/beam5.h5");
        let data = beam5();
        data.save_hdf5(&path).unwrap();
        assert_eq!(BeamDataset::from_file(&path).unwrap(), data);

        let file = hdf5::File::open(&path).unwrap();
        let k = file.dataset("/ForwardModel/SystemMatrix").unwrap();
        assert_eq!(k.read_2d::<f64>().unwrap(), Array2::<f64>::eye(5));
    }

    #[cfg(feature = "hdf5")]
    #[test]
    fn test_hdf5_layouts_and_missing_dataset() {
        std::fs::create_dir_all(OUTDIR).unwrap();
        let path = format!("{OUTDIR}/beam3_rows.h5");
        {
            let file = hdf5::File::create(&path).unwrap();
            let fwd = file.create_group("ForwardModel").unwrap();
            add_dataset(&fwd, "NodeLocations", &array![[0., 0.5, 1.]]);
            add_dataset(&fwd, "SystemMatrix", &Array2::<f64>::eye(3));
            let obs = file.create_group("Observations").unwrap();
            add_dataset(&obs, "ObservationMatrix", &array![[1., 0., 0.]]);
            add_dataset(&obs, "ObservationData", &array![[0.3]]);
        }
        match BeamDataset::from_hdf5(&path) {
            Err(InverseError::MissingDataset(name)) => assert_eq!(name, LOAD_SUM),
            res => panic!("unexpected result {:?}", res),
        }

        {
            let file = hdf5::File::append(&path).unwrap();
            let obs = file.group("Observations").unwrap();
            add_dataset(&obs, "LoadSum", &array![2.]);
        }
        let data = BeamDataset::from_hdf5(&path).unwrap();
        assert_abs_diff_eq!(data.nodes(), &array![0., 0.5, 1.]);
        assert_abs_diff_eq!(data.observation_data(), &array![0.3]);
        assert_abs_diff_eq!(data.load_sum(), 2.);
    }

    #[test]
    fn test_invalid_shapes() {
        let res = BeamDataset::new(
            Array::linspace(0., 4., 5),
            Array2::eye(4),
            Array2::zeros((2, 5)),
            array![0.1, -0.2],
            1.,
        );
        assert!(matches!(
            res,
            Err(InverseError::InvalidDataset { name, .. }) if name == SYSTEM_MATRIX
        ));

        let res = BeamDataset::new(
            Array::linspace(0., 4., 5),
            Array2::eye(5),
            Array2::zeros((2, 5)),
            array![0.1],
            1.,
        );
        assert!(matches!(
            res,
            Err(InverseError::InvalidDataset { name, .. }) if name == OBSERVATION_DATA
        ));

        let res = BeamDataset::new(
            Array::linspace(0., 4., 5),
            Array2::eye(5),
            Array2::zeros((2, 5)),
            array![0.1, f64::NAN],
            1.,
        );
        assert!(matches!(res, Err(InverseError::InvalidDataset { .. })));
    }

    #[test]
    fn test_into_vector() {
        let v = into_vector("v", array![[1., 2., 3.]].into_dyn()).unwrap();
        assert_eq!(v, array![1., 2., 3.]);
        assert!(into_vector("v", Array2::<f64>::zeros((2, 2)).into_dyn()).is_err());
        assert!(into_matrix("m", array![1., 2.].into_dyn()).is_err());
    }
}
