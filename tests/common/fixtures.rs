//! Static Apex debug log corpora used across harnesses.
//!
//! The whole-log constants are complete captures or captures cut in one
//! specific way each, so a harness can point at exactly one truncation
//! signal. The line corpora feed the tokenizer harness.

/// A complete capture: header, execution start/finish, balanced scopes and a
/// cumulative limit summary.
pub const COMPLETE_LOG: &str = "\
62.0 APEX_CODE,FINEST;APEX_PROFILING,INFO;CALLOUT,INFO;DB,INFO;SYSTEM,DEBUG;VALIDATION,INFO;VISUALFORCE,INFO;WORKFLOW,INFO
09:15:02.123 (1234567)|USER_INFO|[EXTERNAL]|005xx000001Sv6s|admin@example.com|(GMT-08:00) Pacific Standard Time (America/Los_Angeles)|GMT-08:00
09:15:02.123 (1301234)|EXECUTION_STARTED
09:15:02.123 (1312345)|CODE_UNIT_STARTED|[EXTERNAL]|01pxx0000004C9d|AccountService.refresh
09:15:02.124 (2001234)|METHOD_ENTRY|[1]|01pxx0000004C9d|AccountService.refresh()
09:15:02.125 (3101234)|SOQL_EXECUTE_BEGIN|[12]|Aggregations:0|SELECT Id, Name FROM Account WHERE OwnerId = :tmpVar1 LIMIT 200
09:15:02.140 (18201234)|SOQL_EXECUTE_END|[12]|Rows:42
09:15:02.141 (19301234)|USER_DEBUG|[14]|DEBUG|refreshed 42 accounts
09:15:02.141 (19401234)|METHOD_EXIT|[1]|01pxx0000004C9d|AccountService.refresh()
09:15:02.142 (20501234)|CUMULATIVE_LIMIT_USAGE
09:15:02.142 (20501234)|LIMIT_USAGE_FOR_NS|(default)|
  Number of SOQL queries: 1 out of 100
  Number of query rows: 42 out of 50000
  Maximum CPU time: 18 out of 10000
09:15:02.142 (20601234)|CUMULATIVE_LIMIT_USAGE_END
09:15:02.143 (21701234)|CODE_UNIT_FINISHED|AccountService.refresh
09:15:02.143 (21801234)|EXECUTION_FINISHED
";

/// The platform's line-skipping banner in the middle of a capture.
pub const SKIPPED_LOG: &str = "\
62.0 APEX_CODE,FINEST;DB,INFO;SYSTEM,DEBUG
09:15:02.123 (1301234)|EXECUTION_STARTED
09:15:02.123 (1312345)|CODE_UNIT_STARTED|[EXTERNAL]|01pxx0000004C9d|AccountService.refresh
09:15:02.124 (2001234)|USER_DEBUG|[3]|DEBUG|first batch
*** Skipped 2097152 bytes of detailed log
09:15:09.877 (7754001234)|USER_DEBUG|[3]|DEBUG|last batch
";

/// Capture cut inside a SOQL statement.
pub const CUT_QUERY_LOG: &str = "\
62.0 APEX_CODE,FINEST;DB,INFO
09:15:02.123 (1301234)|EXECUTION_STARTED
09:15:02.123 (1312345)|CODE_UNIT_STARTED|[EXTERNAL]|01pxx0000004C9d|AccountService.refresh
09:15:02.124 (2001234)|METHOD_ENTRY|[1]|01pxx0000004C9d|AccountService.refresh()
09:15:02.125 (3101234)|SOQL_EXECUTE_BEGIN|[12]|Aggregations:0|SELECT Id, Name FROM Account WHERE
";

/// Capture that ends on a fatal error whose stack trace was cut.
pub const CUT_EXCEPTION_LOG: &str = "\
62.0 APEX_CODE,FINEST
09:15:02.123 (1301234)|EXECUTION_STARTED
09:15:02.123 (1312345)|CODE_UNIT_STARTED|[EXTERNAL]|01pxx0000004C9d|AccountService.refresh
09:15:02.124 (2001234)|METHOD_ENTRY|[1]|01pxx0000004C9d|AccountService.refresh()
09:15:02.125 (3101234)|FATAL_ERROR|System.NullPointerException: Attempt to de-reference a null object
Class.Acc
";

/// Well-formed event lines of assorted shapes.
pub const EVENT_LINES: &[&str] = &[
    "12:34:56.789 (123456789)|METHOD_ENTRY|[1]|MyClass.doWork",
    "09:15:02.123 (1301234)|EXECUTION_STARTED",
    "09:15:02.125 (3101234)|SOQL_EXECUTE_BEGIN|[12]|Aggregations:0|SELECT Id FROM Account",
    "09:15:02.141 (19301234)|USER_DEBUG|[14]|DEBUG|a | piped | message",
    "9:05:02.1 (0)|CODE_UNIT_STARTED|[EXTERNAL]|execute_anonymous_apex",
    "23:59:59.999 (9223372036854775807)|EXECUTION_FINISHED",
    "09:15:02.125 (3101234)|FATAL_ERROR|System.LimitException: Too many SOQL queries: 101",
    "09:15:02.125 (3101234)|HOLOGRAM_PROJECTED|[7]|unknown to the registry",
    "09:15:02.125 (3101234)|USER_DEBUG [7]|DEBUG|bracketed type suffix",
    "09:15:02.125 (3101234)|VARIABLE_ASSIGNMENT|[5]|acc|{\"Name\":\"Acme\"}|0x1a2b3c\r",
];

/// Lines that are not events and must tokenize to nothing.
pub const NON_EVENT_LINES: &[&str] = &[
    "",
    "   ",
    "\t",
    "48.0 APEX_CODE,FINEST;APEX_PROFILING,INFO",
    "62.0 APEX_CODE,DEBUG;DB,INFO;SYSTEM,DEBUG",
    "  Number of SOQL queries: 1 out of 100",
    "Class.AccountService.refresh: line 12, column 1",
    "AnonymousBlock: line 1, column 1",
    "Execute Anonymous: System.debug('hi');",
    "09:15:02.123 EXECUTION_STARTED",
    "09:15:02.123 (abc)|EXECUTION_STARTED",
];

/// Lines with an event's shape but a broken field.
pub const MALFORMED_EVENT_LINES: &[&str] = &[
    "09:15:02.123 (99999999999999999999)|USER_DEBUG|[1]|DEBUG|overflow",
    "09:15:02.123 (1301234)||EXECUTION_STARTED",
];

/// `target_bytes` of otherwise complete log: start, padding debug output,
/// limit summary, finish. The final line is always `EXECUTION_FINISHED`.
pub fn padded_complete_log(target_bytes: usize) -> String {
    const HEAD: &str = "09:15:02.123 (1301234)|EXECUTION_STARTED\n";
    const TAIL: &str = "09:15:09.000 (9000000000)|CUMULATIVE_LIMIT_USAGE\n\
        09:15:09.000 (9000000001)|CUMULATIVE_LIMIT_USAGE_END\n\
        09:15:09.001 (9001000000)|EXECUTION_FINISHED\n";

    let mut log = String::with_capacity(target_bytes + 1024);
    log.push_str(HEAD);
    let payload = "x".repeat(960);
    let mut nanos = 2_000_000u64;
    while log.len() + TAIL.len() < target_bytes {
        let remaining = target_bytes - log.len() - TAIL.len();
        let line = format!("09:15:03.000 ({nanos})|USER_DEBUG|[7]|DEBUG|{payload}\n");
        if line.len() <= remaining {
            log.push_str(&line);
        } else {
            // Pad the last stretch with continuation text that is not an event.
            log.push_str(&"y".repeat(remaining.saturating_sub(1)));
            log.push('\n');
        }
        nanos += 1_000;
    }
    log.push_str(TAIL);
    log
}
