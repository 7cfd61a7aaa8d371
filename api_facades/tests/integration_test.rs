//! Integration tests for api_facades crate
//!
//! These tests call the C entry points the way a C caller would.

use api_facades::*;
use std::ptr;

#[test]
fn test_select_with_nothing_to_wait_on() {
    let _ = env_logger::builder().is_test(true).try_init();
    let tv = W32TimeVal { tv_sec: 0, tv_usec: 10_000 };
    let rc = unsafe { w32_select(0, ptr::null_mut(), ptr::null_mut(), ptr::null_mut(), &tv) };
    assert_eq!(rc, 0);
}

#[test]
fn test_nfds_beyond_capacity_is_an_error() {
    let mut readfds = DescriptorSet::new();
    let tv = W32TimeVal::default();
    let rc = unsafe { w32_select(1000, &mut readfds, ptr::null_mut(), ptr::null_mut(), &tv) };
    assert_eq!(rc, -1);
}

#[cfg(unix)]
mod unix {
    use super::*;
    use std::os::raw::c_int;

    fn pipe() -> [c_int; 2] {
        let mut fds = [0; 2];
        assert_eq!(unsafe { libc::pipe(fds.as_mut_ptr()) }, 0);
        fds
    }

    fn close(fds: [c_int; 2]) {
        unsafe {
            libc::close(fds[0]);
            libc::close(fds[1]);
        }
    }

    #[test]
    fn test_select_marks_only_ready_pipe() {
        let ready = pipe();
        let idle = pipe();
        assert_eq!(unsafe { libc::write(ready[1], b"x".as_ptr().cast(), 1) }, 1);

        let mut readfds = DescriptorSet::new();
        let tv = W32TimeVal { tv_sec: 5, tv_usec: 0 };
        let rc = unsafe {
            w32_fd_zero(&mut readfds);
            w32_fd_set(ready[0], &mut readfds);
            w32_fd_set(idle[0], &mut readfds);
            w32_select(
                ready[0].max(idle[0]) + 1,
                &mut readfds,
                ptr::null_mut(),
                ptr::null_mut(),
                &tv,
            )
        };

        assert_eq!(rc, 1);
        unsafe {
            assert_eq!(w32_fd_isset(ready[0], &readfds), 1);
            assert_eq!(w32_fd_isset(idle[0], &readfds), 0);
        }
        close(ready);
        close(idle);
    }

    #[test]
    fn test_select_times_out_and_clears() {
        let idle = pipe();

        let mut readfds = DescriptorSet::new();
        let mut exceptfds = DescriptorSet::new();
        let tv = W32TimeVal { tv_sec: 0, tv_usec: 20_000 };
        let rc = unsafe {
            w32_fd_set(idle[0], &mut readfds);
            w32_fd_set(idle[0], &mut exceptfds);
            w32_select(idle[0] + 1, &mut readfds, ptr::null_mut(), &mut exceptfds, &tv)
        };

        assert_eq!(rc, 0);
        assert!(readfds.is_empty());
        assert!(exceptfds.is_empty());
        close(idle);
    }
}
