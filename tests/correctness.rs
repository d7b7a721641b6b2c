use approx::assert_relative_eq;
use num_complex::Complex64;
use strided_matrix::{
    copy_into, iamax, matmul, matvec, reshape, s, transpose, DimSpec, Matrix, MatrixError,
    MatrixView, MatrixViewMut,
};

fn make_matrix(rows: usize, cols: usize) -> Matrix<f64, 2> {
    Matrix::from_fn([rows, cols], |idx| (idx[0] * cols + idx[1]) as f64)
}

#[test]
fn test_scalar_then_elementwise() {
    let m2 = Matrix::from([[1, 2, 3], [4, 5, 6]]);
    let mut m1 = m2.clone();
    m1 *= 2;
    assert_eq!(m1, Matrix::from([[2, 4, 6], [8, 10, 12]]));
    assert_eq!(&m1 + &m2, Matrix::from([[3, 6, 9], [12, 15, 18]]));
}

#[test]
fn test_matmul_example() {
    let a = Matrix::from([[2, 4, 6], [8, 10, 12]]);
    let b = Matrix::from([[1, 2], [3, 4], [5, 6]]);
    assert_eq!(matmul(&a, &b).unwrap(), Matrix::from([[44, 56], [98, 128]]));
    assert_eq!(a.dot(&b).unwrap(), Matrix::from([[44, 56], [98, 128]]));
}

#[test]
fn test_matmul_f64_matches_reference() {
    let a = make_matrix(7, 5);
    let b = make_matrix(5, 3);
    let c = matmul(&a, &b).unwrap();
    for i in 0..7 {
        for j in 0..3 {
            let expected: f64 = (0..5).map(|l| a[[i, l]] * b[[l, j]]).sum();
            assert_relative_eq!(c[[i, j]], expected, epsilon = 1e-10);
        }
    }
}

#[test]
fn test_matmul_sub_views() {
    let big = make_matrix(6, 6);
    let a: MatrixView<'_, f64, 2> = big.slice(&s![1..3, 2..5]);
    let b: MatrixView<'_, f64, 2> = big.slice(&s![0..3, 4..6]);
    let c = matmul(&a, &b).unwrap();
    let expected = matmul(&a.to_matrix(), &b.to_matrix()).unwrap();
    assert_eq!(c.extents(), &[2, 2]);
    for (x, y) in c.iter().zip(expected.iter()) {
        assert_relative_eq!(*x, *y, epsilon = 1e-10);
    }
}

#[test]
fn test_matvec_against_matmul() {
    let a = make_matrix(4, 3);
    let x = Matrix::from([1.0, -2.0, 0.5]);
    let y = matvec(&a, &x).unwrap();
    let as_col = reshape(&x, [3, 1]).unwrap();
    let expected = matmul(&a, &as_col).unwrap();
    assert_eq!(y.extents(), &[4]);
    for i in 0..4 {
        assert_relative_eq!(y[i], expected[[i, 0]], epsilon = 1e-12);
    }
}

#[test]
fn test_product_dimension_mismatch() {
    let a = make_matrix(2, 3);
    assert!(matches!(
        matmul(&a, &make_matrix(2, 3)),
        Err(MatrixError::DimensionMismatch { .. })
    ));
    assert!(matches!(
        matvec(&a, &Matrix::from([1.0, 2.0])),
        Err(MatrixError::DimensionMismatch { .. })
    ));
}

#[test]
fn test_complex_products_are_filled() {
    let i = Complex64::new(0.0, 1.0);
    let a = Matrix::from([[i, i], [i, -i]]);
    let x = Matrix::from([Complex64::new(1.0, 0.0), Complex64::new(0.0, 1.0)]);
    let y = matvec(&a, &x).unwrap();
    assert_eq!(y[0], Complex64::new(-1.0, 1.0));
    assert_eq!(y[1], Complex64::new(1.0, 1.0));
}

#[test]
fn test_row_extraction() {
    let m = make_matrix(3, 4);
    for i in 0..3 {
        let row = m.row(i);
        assert_eq!(row.len(), 4);
        let got: Vec<f64> = row.iter().copied().collect();
        assert_eq!(got, m.data()[i * 4..(i + 1) * 4].to_vec());
    }
}

#[test]
fn test_col_extraction() {
    let m = make_matrix(3, 4);
    let col = m.col(2);
    assert_eq!(col.iter().copied().collect::<Vec<_>>(), vec![2.0, 6.0, 10.0]);
}

#[test]
fn test_rank_three_rows_and_cols() {
    let t = Matrix::<i32, 3>::from_fn([2, 3, 4], |idx| (idx[0] * 100 + idx[1] * 10 + idx[2]) as i32);
    let plane = t.row(1);
    assert_eq!(plane.extents(), &[3, 4]);
    let line = plane.row(2);
    assert_eq!(line.iter().copied().collect::<Vec<_>>(), vec![120, 121, 122, 123]);
    let cut = t.col(0);
    assert_eq!(cut.extents(), &[2, 4]);
    assert_eq!(cut[[1, 3]], 103);
}

#[test]
fn test_slice_dispatch() {
    let m = Matrix::from([[1, 2, 3], [4, 5, 6], [7, 8, 9]]);

    let elem: MatrixView<'_, i32, 0> = m.slice(&s![2, 1]);
    assert_eq!(*elem, 8);

    let tail: MatrixView<'_, i32, 1> = m.slice(&s![1, 1..]);
    assert_eq!(tail.iter().copied().collect::<Vec<_>>(), vec![5, 6]);

    let block: MatrixView<'_, i32, 2> = m.slice(&[DimSpec::range(0, 2), DimSpec::All]);
    assert_eq!(block, Matrix::from([[1, 2, 3], [4, 5, 6]]).view());

    let nested: MatrixView<'_, i32, 1> = block.slice(&s![.., 2]);
    assert_eq!(nested.iter().copied().collect::<Vec<_>>(), vec![3, 6]);
}

#[test]
fn test_slice_errors() {
    let m = Matrix::from([[1, 2], [3, 4]]);
    assert_eq!(
        m.try_slice::<1>(&s![5]).unwrap_err(),
        MatrixError::IndexOutOfRange {
            axis: 0,
            index: 5,
            extent: 2
        }
    );
    assert_eq!(
        m.try_slice::<2>(&s![0, ..]).unwrap_err(),
        MatrixError::RankMismatch(1, 2)
    );
}

#[test]
#[should_panic(expected = "out of range")]
fn test_col_out_of_range_panics() {
    let m = Matrix::from([[1, 2], [3, 4]]);
    let _ = m.col(2);
}

#[test]
fn test_view_aliases_parent() {
    let mut m = make_matrix(4, 4);
    {
        let mut window = m.slice_mut::<2>(&s![1..3, 1..3]);
        window[[0, 1]] = -1.0;
        window.row_mut(1).fill(100.0);
    }
    assert_eq!(m[[1, 2]], -1.0);
    assert_eq!(m[[2, 1]], 100.0);
    assert_eq!(m[[2, 2]], 100.0);
    assert_eq!(m[[2, 3]], 11.0);
}

#[test]
fn test_raw_view_over_foreign_buffer() {
    let mut buffer: Vec<i32> = (0..10).collect();
    {
        // Every other element, read backwards.
        let mut v = MatrixViewMut::new(&mut buffer, [5], [-2], 8).unwrap();
        assert_eq!(v.iter().copied().collect::<Vec<_>>(), vec![8, 6, 4, 2, 0]);
        v += 1;
    }
    assert_eq!(buffer, vec![1, 1, 3, 3, 5, 5, 7, 7, 9, 9]);
    assert!(MatrixView::new(&buffer, [5], [-2], 7).is_err());
}

#[test]
fn test_assign_across_types() {
    let src = Matrix::from([[1u8, 2], [3, 4]]);
    let mut dst: Matrix<f64, 3> = Matrix::new([2, 2, 2]);
    dst.row_mut(1).assign(&src).unwrap();
    assert_eq!(dst.data(), &[0.0, 0.0, 0.0, 0.0, 1.0, 2.0, 3.0, 4.0]);

    let wrong = Matrix::from([1u8, 2, 3, 4]);
    let mut dst1: Matrix<f64, 1> = Matrix::new([3]);
    assert_eq!(
        dst1.assign(&wrong).unwrap_err(),
        MatrixError::ShapeMismatch(vec![3], vec![4])
    );
}

#[test]
fn test_assign_nested_into_view() {
    let mut m: Matrix<i32, 2> = Matrix::new([3, 3]);
    m.slice_mut::<2>(&s![..2, 1..])
        .assign_nested(vec![vec![1, 2], vec![3, 4]])
        .unwrap();
    assert_eq!(m, Matrix::from([[0, 1, 2], [0, 3, 4], [0, 0, 0]]));

    let err = m
        .slice_mut::<2>(&s![..2, 1..])
        .assign_nested(vec![vec![1, 2, 3]])
        .unwrap_err();
    assert_eq!(err, MatrixError::ShapeMismatch(vec![2, 2], vec![1, 3]));
}

#[test]
fn test_nested_construction() {
    let m = Matrix::<f64, 2>::from_nested(vec![vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap();
    assert_eq!(m.nrows(), 3);
    assert_eq!(m.ncols(), 2);
    assert_eq!(
        Matrix::<f64, 2>::from_nested(vec![vec![1.0], vec![]]).unwrap_err(),
        MatrixError::RaggedInitializer {
            level: 1,
            expected: 1,
            found: 0
        }
    );
}

#[test]
fn test_reshape_and_transpose() {
    let a = make_matrix(2, 3);
    let r: Matrix<f64, 2> = reshape(&a, [3, 2]).unwrap();
    assert_eq!(r.data(), a.data());
    assert!(matches!(
        reshape::<f64, _, 2, 1>(&a, [5]),
        Err(MatrixError::SizeMismatch { .. })
    ));

    let t = transpose(&a);
    assert_eq!(t.extents(), &[3, 2]);
    for i in 0..2 {
        for j in 0..3 {
            assert_eq!(t[[j, i]], a[[i, j]]);
        }
    }
}

#[test]
fn test_mixed_operator_set() {
    let a = Matrix::from([[1.0, 2.0], [3.0, 4.0]]);
    let b = Matrix::from([[4.0, 3.0], [2.0, 1.0]]);

    let from_views = a.view() + b.view();
    let from_refs = &a + &b;
    let mixed = &a + b.view();
    let crossed = a.view() + &b;
    assert_eq!(from_views, from_refs);
    assert_eq!(mixed, from_refs);
    assert_eq!(crossed, from_refs);

    assert_eq!(2.0 * &a, &a + &a);
    assert_eq!(1.0 / &a, Matrix::from([[1.0, 0.5], [1.0 / 3.0, 0.25]]));
    assert_eq!(&a % 2.0, Matrix::from([[1.0, 0.0], [1.0, 0.0]]));
}

#[test]
fn test_copy_into_and_iamax() {
    let src = make_matrix(3, 3);
    let mut dst: Matrix<f64, 2> = Matrix::new([3, 3]);
    copy_into(&mut dst, &src.t()).unwrap();
    assert_eq!(dst, transpose(&src));

    let v = Matrix::from([0.5, -4.0, 3.0, 4.0]);
    assert_eq!(iamax(&v), Some(1));
}

#[test]
fn test_display() {
    let m = Matrix::from([[1, 2], [3, 4]]);
    assert_eq!(format!("{m}"), "[[1, 2], [3, 4]]");
    assert_eq!(format!("{}", m.row(1)), "[3, 4]");
    assert_eq!(format!("{}", m.slice::<0>(&s![0, 1])), "2");
}

#[test]
fn test_packed_iteration_order() {
    let m = make_matrix(3, 5);
    let walked: Vec<f64> = m.iter().copied().collect();
    assert_eq!(walked, m.data().to_vec());
}
