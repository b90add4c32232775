use listbench::{populate, ListPolicy, SerialList, SortedList, MAX_VALUE};
use rand::rngs::StdRng;
use rand::SeedableRng;

fn assert_strictly_increasing(values: &[u32]) {
    for pair in values.windows(2) {
        assert!(pair[0] < pair[1], "{} is not below {}", pair[0], pair[1]);
    }
}

#[test]
fn population_is_exact_and_sorted() {
    for &n in &[0, 1, 100, 1000, 5000] {
        let list = SerialList::new();
        let mut rng = StdRng::seed_from_u64(u64::from(n));
        let draws = populate(&list, n, &mut rng).unwrap();
        assert!(draws >= u64::from(n));

        let values = list.values().unwrap();
        assert_eq!(values.len(), n as usize);
        assert_eq!(list.len().unwrap(), n as usize);
        assert_strictly_increasing(&values);
        assert!(values.iter().all(|v| *v < MAX_VALUE));
    }
}

#[test]
fn population_beyond_the_range_is_rejected() {
    let list = SerialList::new();
    let mut rng = StdRng::seed_from_u64(1);
    assert!(populate(&list, MAX_VALUE + 1, &mut rng).is_err());
    assert!(list.is_empty().unwrap());
}

#[test]
fn duplicate_insert_changes_nothing() {
    let mut list = SortedList::new();
    for v in &[40, 10, 30, 20] {
        assert!(list.insert(*v).unwrap());
    }
    let before: Vec<u32> = list.iter().collect();
    for v in &[10, 20, 30, 40] {
        assert!(!list.insert(*v).unwrap());
    }
    let after: Vec<u32> = list.iter().collect();
    assert_eq!(before, after);
    assert_eq!(after, vec![10, 20, 30, 40]);
    assert_eq!(list.len(), 4);
}

#[test]
fn insert_at_head_middle_and_tail() {
    let mut list = SortedList::new();
    assert!(list.insert(50).unwrap());
    assert!(list.insert(0).unwrap());
    assert!(list.insert(MAX_VALUE - 1).unwrap());
    assert!(list.insert(25).unwrap());
    assert_eq!(list.iter().collect::<Vec<_>>(), vec![0, 25, 50, MAX_VALUE - 1]);
}

#[test]
fn insert_out_of_range_is_an_error() {
    let mut list = SortedList::new();
    assert!(list.insert(MAX_VALUE).is_err());
    assert!(list.is_empty());
}

#[test]
fn delete_absent_changes_nothing() {
    let mut list = SortedList::new();
    for v in &[3, 6, 9] {
        list.insert(*v).unwrap();
    }
    for v in &[0, 4, 10, MAX_VALUE + 5] {
        assert!(!list.delete(*v));
    }
    assert_eq!(list.iter().collect::<Vec<_>>(), vec![3, 6, 9]);

    let mut empty = SortedList::new();
    assert!(!empty.delete(3));
    assert!(empty.is_empty());
}

#[test]
fn delete_present_removes_exactly_that_value() {
    let mut list = SortedList::new();
    for v in 0..10 {
        list.insert(v * 10).unwrap();
    }
    // head, middle, tail
    for &(v, len) in &[(0, 9), (50, 8), (90, 7)] {
        assert!(list.delete(v));
        assert_eq!(list.len(), len);
        assert!(!list.member(v));
    }
    assert_eq!(
        list.iter().collect::<Vec<_>>(),
        vec![10, 20, 30, 40, 60, 70, 80]
    );
}

#[test]
fn member_stops_at_first_larger_value() {
    let mut list = SortedList::new();
    for v in &[2, 4, 8] {
        list.insert(*v).unwrap();
    }
    assert!(list.member(2));
    assert!(list.member(8));
    assert!(!list.member(3));
    assert!(!list.member(9));
    assert!(!list.member(0));
}

#[test]
fn clear_empties_the_list() {
    let mut list = SortedList::new();
    for v in 0..500 {
        list.insert(v).unwrap();
    }
    list.clear();
    assert!(list.is_empty());
    assert_eq!(list.iter().count(), 0);
    assert!(list.insert(7).unwrap());
    assert_eq!(list.iter().collect::<Vec<_>>(), vec![7]);
}
