//! JNI surface for `com.example.hackernews.MainActivity`.
//!
//! Marshaling lives here and nowhere else: the fetch operations only ever see Rust strings
//! and return [`crate::error::Result`]s. Failures reach Kotlin as data (the error message
//! in place of the normal result), with two exceptions: a null `cacert` aborts through
//! `FatalError`, and a marshaling failure inside the JVM raises a `RuntimeException`.

use jni::objects::{JObject, JString};
use jni::sys::{jobjectArray, jsize, jstring};
use jni::JNIEnv;

const NULL_CACERT_MESSAGE: &str = "cacert argument cannot be null";
const RUNTIME_EXCEPTION_CLASS: &str = "java/lang/RuntimeException";
const STRING_CLASS: &str = "java/lang/String";

static LOG_GUARD: std::sync::OnceLock<Option<tracing_appender::non_blocking::WorkerGuard>> =
    std::sync::OnceLock::new();

fn ensure_logging() {
    LOG_GUARD.get_or_init(|| {
        let config = crate::config::config();
        crate::logging::init(config.log_to_console, config.log_dir.as_deref())
    });
}

pub fn jstring_to_string(env: &mut JNIEnv, value: &JString) -> jni::errors::Result<String> {
    Ok(env.get_string(value)?.into())
}

pub fn string_to_jstring(env: &mut JNIEnv, value: &str) -> jni::errors::Result<jstring> {
    Ok(env.new_string(value)?.into_raw())
}

pub fn strings_to_jobject_array(
    env: &mut JNIEnv,
    values: &[String],
) -> jni::errors::Result<jobjectArray> {
    let length = jsize::try_from(values.len()).map_err(|_| {
        jni::errors::Error::JniCall(jni::errors::JniError::InvalidArguments)
    })?;
    let array = env.new_object_array(length, STRING_CLASS, JObject::null())?;

    for (index, value) in (0..length).zip(values) {
        let element = env.new_string(value)?;
        env.set_object_array_element(&array, index, &element)?;
        env.delete_local_ref(element)?;
    }

    Ok(array.into_raw())
}

/// Flattens a titles result into what Kotlin expects: the titles, or the error message as
/// the only element.
pub fn titles_for_host(result: crate::error::Result<Vec<String>>) -> Vec<String> {
    match result {
        Ok(titles) => titles,
        Err(e) => {
            tracing::error!(error =? e, kind = %e.kind(), "Error getting titles");
            vec![e.to_string()]
        }
    }
}

/// Flattens a raw list result into the body, or the error message.
pub fn raw_for_host(result: crate::error::Result<String>) -> String {
    match result {
        Ok(body) => body,
        Err(e) => {
            tracing::error!(error =? e, kind = %e.kind(), "Error getting raw best stories");
            e.to_string()
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        format!("hackernews panicked: {}", message)
    } else if let Some(message) = payload.downcast_ref::<String>() {
        format!("hackernews panicked: {}", message)
    } else {
        "hackernews panicked".to_string()
    }
}

// Runs `call` with panics caught; on any failure a RuntimeException is left pending and
// null is returned to the JVM.
fn call_into_host<'local, T>(
    env: &mut JNIEnv<'local>,
    call: impl FnOnce(&mut JNIEnv<'local>) -> jni::errors::Result<*mut T>,
) -> *mut T {
    let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| call(env)));

    let message = match outcome {
        Ok(Ok(value)) => return value,
        Ok(Err(e)) => format!("JNI marshaling failed: {}", e),
        Err(payload) => panic_message(payload.as_ref()),
    };

    tracing::error!(message = %message, "Returning null to the JVM");
    if !env.exception_check().unwrap_or(false) {
        if let Err(e) = env.throw_new(RUNTIME_EXCEPTION_CLASS, &message) {
            tracing::error!(error =? e, "Could not throw RuntimeException");
        }
    }

    std::ptr::null_mut()
}

// Shared body of both entry points. A null `cacert` is a broken caller and aborts the VM;
// everything after the null check runs under `call_into_host`.
fn host_entry<'local, T>(
    mut env: JNIEnv<'local>,
    cacert: JString<'local>,
    fetch: impl FnOnce(&mut JNIEnv<'local>, &str) -> jni::errors::Result<*mut T>,
) -> *mut T {
    ensure_logging();

    if cacert.is_null() {
        env.fatal_error(NULL_CACERT_MESSAGE);
    }

    call_into_host(&mut env, |env| {
        let cacert = jstring_to_string(env, &cacert)?;
        fetch(env, &cacert)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_hackernews_MainActivity_getHackerNews<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    cacert: JString<'local>,
) -> jobjectArray {
    host_entry(env, cacert, |env, cacert| {
        let titles = titles_for_host(crate::get_titles(cacert));
        strings_to_jobject_array(env, &titles)
    })
}

#[unsafe(no_mangle)]
pub extern "system" fn Java_com_example_hackernews_MainActivity_getHackerNewsRaw<'local>(
    env: JNIEnv<'local>,
    _this: JObject<'local>,
    cacert: JString<'local>,
) -> jstring {
    host_entry(env, cacert, |env, cacert| {
        let body = raw_for_host(crate::get_raw_best_stories(cacert));
        string_to_jstring(env, &body)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use jni::objects::JObjectArray;

    // One VM per process; the JNI invocation API cannot create a second one.
    static JVM: std::sync::LazyLock<jni::JavaVM> = std::sync::LazyLock::new(|| {
        let args = jni::InitArgsBuilder::new()
            .version(jni::JNIVersion::V8)
            .option("-XX:-CreateCoredumpOnCrash")
            .build()
            .unwrap();
        jni::JavaVM::new(args).unwrap()
    });

    const NULL_CACERT_ENTRY_VAR: &str = "HACKERNEWS_NULL_CACERT_ENTRY";

    fn read_string_array(env: &mut JNIEnv, raw: jobjectArray) -> Vec<String> {
        assert!(!raw.is_null());
        let array = unsafe { JObjectArray::from_raw(raw) };
        let length = env.get_array_length(&array).unwrap();

        (0..length)
            .map(|index| {
                let element =
                    JString::from(env.get_object_array_element(&array, index).unwrap());
                jstring_to_string(env, &element).unwrap()
            })
            .collect()
    }

    #[test]
    fn test_string_round_trips_through_jstring() {
        let mut env = JVM.attach_current_thread().unwrap();

        for value in ["", "Show HN: a tiny JNI bridge", "Ünïcödé, 日本語 and 🚀"] {
            let raw = string_to_jstring(&mut env, value).unwrap();
            assert!(!raw.is_null());
            let jstring = unsafe { JString::from_raw(raw) };

            assert_eq!(jstring_to_string(&mut env, &jstring).unwrap(), value);
        }
    }

    #[test]
    fn test_strings_round_trip_through_object_array() {
        let mut env = JVM.attach_current_thread().unwrap();
        let titles = vec![
            "Ask HN: What are you working on?".to_string(),
            String::new(),
            "Zürich → 東京 🚄".to_string(),
        ];

        let raw = strings_to_jobject_array(&mut env, &titles).unwrap();

        assert_eq!(read_string_array(&mut env, raw), titles);
    }

    #[test]
    fn test_empty_slice_becomes_empty_array() {
        let mut env = JVM.attach_current_thread().unwrap();

        let raw = strings_to_jobject_array(&mut env, &[]).unwrap();

        assert!(read_string_array(&mut env, raw).is_empty());
    }

    #[test]
    fn test_error_reaches_host_as_single_element_array() {
        let mut env = JVM.attach_current_thread().unwrap();
        let cacert = env.new_string("").unwrap();

        let raw = Java_com_example_hackernews_MainActivity_getHackerNews(
            unsafe { env.unsafe_clone() },
            JObject::null(),
            cacert,
        );

        assert!(!env.exception_check().unwrap());
        let result = read_string_array(&mut env, raw);
        assert_eq!(result.len(), 1);
        assert!(result[0].starts_with("Invalid trust anchor"));
    }

    // Re-runs this test in a child process which calls an entry point with a null cacert.
    // The VM aborts the child, so the parent only sees a failed exit and the fatal message.
    #[test]
    fn test_null_cacert_aborts_instead_of_returning() {
        if let Ok(entry) = std::env::var(NULL_CACERT_ENTRY_VAR) {
            let env = JVM.attach_current_thread_permanently().unwrap();
            let cacert = JString::from(JObject::null());
            match entry.as_str() {
                "titles" => {
                    Java_com_example_hackernews_MainActivity_getHackerNews(
                        env,
                        JObject::null(),
                        cacert,
                    );
                }
                _ => {
                    Java_com_example_hackernews_MainActivity_getHackerNewsRaw(
                        env,
                        JObject::null(),
                        cacert,
                    );
                }
            }
            println!("entry point returned");
            std::process::exit(0);
        }

        for entry in ["titles", "raw"] {
            let output = std::process::Command::new(std::env::current_exe().unwrap())
                .args([
                    "--exact",
                    "interop::tests::test_null_cacert_aborts_instead_of_returning",
                    "--nocapture",
                    "--test-threads=1",
                ])
                .env(NULL_CACERT_ENTRY_VAR, entry)
                .output()
                .unwrap();

            let stdout = String::from_utf8_lossy(&output.stdout);
            let stderr = String::from_utf8_lossy(&output.stderr);
            assert!(
                !output.status.success(),
                "{} entry returned normally\n{}\n{}",
                entry,
                stdout,
                stderr
            );
            assert!(!stdout.contains("entry point returned"));
            assert!(
                stdout.contains(NULL_CACERT_MESSAGE) || stderr.contains(NULL_CACERT_MESSAGE),
                "{} entry did not report the fatal error\n{}\n{}",
                entry,
                stdout,
                stderr
            );
        }
    }

    #[test]
    fn test_titles_pass_through_on_success() {
        let titles = vec!["Foo".to_string(), "Bar".to_string()];
        assert_eq!(titles_for_host(Ok(titles.clone())), titles);
    }

    #[test]
    fn test_empty_titles_stay_empty() {
        assert!(titles_for_host(Ok(vec![])).is_empty());
    }

    #[test]
    fn test_title_error_becomes_single_element() {
        let result = titles_for_host(Err(crate::error::FetchError::Status {
            url: "https://hacker-news.firebaseio.com/v0/beststories.json".to_string(),
            status: 500,
        }));

        assert_eq!(
            result,
            vec![
                "Request to https://hacker-news.firebaseio.com/v0/beststories.json returned HTTP 500"
                    .to_string()
            ]
        );
    }

    #[test]
    fn test_raw_error_becomes_message() {
        let result = raw_for_host(Err(crate::error::FetchError::TrustAnchor {
            message: "cacert argument is empty".to_string(),
        }));

        assert_eq!(result, "Invalid trust anchor: cacert argument is empty");
    }

    #[test]
    fn test_empty_cacert_is_reported_as_data() {
        let result = titles_for_host(crate::get_titles(""));

        assert_eq!(result.len(), 1);
        assert!(result[0].starts_with("Invalid trust anchor"));
    }

    #[test]
    fn test_panic_message_extracts_payload() {
        let payload: Box<dyn std::any::Any + Send> = Box::new("boom");
        assert_eq!(panic_message(payload.as_ref()), "hackernews panicked: boom");

        let payload: Box<dyn std::any::Any + Send> = Box::new(String::from("bang"));
        assert_eq!(panic_message(payload.as_ref()), "hackernews panicked: bang");

        let payload: Box<dyn std::any::Any + Send> = Box::new(7_u8);
        assert_eq!(panic_message(payload.as_ref()), "hackernews panicked");
    }
}
