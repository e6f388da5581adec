//! Event-type registry: canonicalises raw event-type text against the closed
//! set of Apex debug log event types.
//!
//! The table is a compile-time perfect hash map, so lookups never allocate and
//! the registry is immutable for the life of the process. Raw text that is not
//! in the table maps to [`EventType::Unknown`]: the log grammar gains new types
//! upstream and older parsers must keep tokenizing newer logs.

use serde::Serialize;

/// Log API version whose event vocabulary this table tracks.
pub const REGISTRY_VERSION: &str = "62.0";

/// A known Apex debug log event type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EventType {
    ExecutionStarted,
    ExecutionFinished,
    CodeUnitStarted,
    CodeUnitFinished,
    MethodEntry,
    MethodExit,
    ConstructorEntry,
    ConstructorExit,
    SystemMethodEntry,
    SystemMethodExit,
    SystemConstructorEntry,
    SystemConstructorExit,
    SystemModeEnter,
    SystemModeExit,
    SoqlExecuteBegin,
    SoqlExecuteEnd,
    SoqlExecuteExplain,
    SoslExecuteBegin,
    SoslExecuteEnd,
    DmlBegin,
    DmlEnd,
    CalloutRequest,
    CalloutResponse,
    NamedCredentialRequest,
    NamedCredentialResponse,
    UserDebug,
    UserInfo,
    ExceptionThrown,
    FatalError,
    LimitUsage,
    LimitUsageForNs,
    CumulativeLimitUsage,
    CumulativeLimitUsageEnd,
    CumulativeProfiling,
    CumulativeProfilingBegin,
    CumulativeProfilingEnd,
    HeapAllocate,
    HeapDeallocate,
    StatementExecute,
    VariableScopeBegin,
    VariableScopeEnd,
    VariableAssignment,
    StaticVariableList,
    EnteringManagedPkg,
    FlowStartInterviewsBegin,
    FlowStartInterviewsEnd,
    FlowStartInterviewBegin,
    FlowStartInterviewEnd,
    FlowElementBegin,
    FlowElementEnd,
    FlowElementError,
    FlowInterviewFinished,
    WfRuleEvalBegin,
    WfRuleEvalEnd,
    WfCriteriaBegin,
    WfCriteriaEnd,
    WfFieldUpdate,
    ValidationRule,
    ValidationFormula,
    ValidationPass,
    ValidationFail,
    ValidationError,
    QueryMoreBegin,
    QueryMoreEnd,
    QueryMoreIterations,
    PushTraceFlags,
    PopTraceFlags,
    TestingLimits,
    VfApexCallStart,
    VfApexCallEnd,
    VfPageMessage,
    DuplicateDetectionBegin,
    DuplicateDetectionEnd,
    SavepointSet,
    SavepointRollback,
    TotalEmailRecipientsQueued,
    EmailQueue,
    NbaNodeBegin,
    NbaNodeEnd,
    /// Sentinel for event-type text not present in the registry.
    Unknown,
}

static KNOWN_TYPES: phf::Map<&'static str, EventType> = phf::phf_map! {
    "EXECUTION_STARTED" => EventType::ExecutionStarted,
    "EXECUTION_FINISHED" => EventType::ExecutionFinished,
    "CODE_UNIT_STARTED" => EventType::CodeUnitStarted,
    "CODE_UNIT_FINISHED" => EventType::CodeUnitFinished,
    "METHOD_ENTRY" => EventType::MethodEntry,
    "METHOD_EXIT" => EventType::MethodExit,
    "CONSTRUCTOR_ENTRY" => EventType::ConstructorEntry,
    "CONSTRUCTOR_EXIT" => EventType::ConstructorExit,
    "SYSTEM_METHOD_ENTRY" => EventType::SystemMethodEntry,
    "SYSTEM_METHOD_EXIT" => EventType::SystemMethodExit,
    "SYSTEM_CONSTRUCTOR_ENTRY" => EventType::SystemConstructorEntry,
    "SYSTEM_CONSTRUCTOR_EXIT" => EventType::SystemConstructorExit,
    "SYSTEM_MODE_ENTER" => EventType::SystemModeEnter,
    "SYSTEM_MODE_EXIT" => EventType::SystemModeExit,
    "SOQL_EXECUTE_BEGIN" => EventType::SoqlExecuteBegin,
    "SOQL_EXECUTE_END" => EventType::SoqlExecuteEnd,
    "SOQL_EXECUTE_EXPLAIN" => EventType::SoqlExecuteExplain,
    "SOSL_EXECUTE_BEGIN" => EventType::SoslExecuteBegin,
    "SOSL_EXECUTE_END" => EventType::SoslExecuteEnd,
    "DML_BEGIN" => EventType::DmlBegin,
    "DML_END" => EventType::DmlEnd,
    "CALLOUT_REQUEST" => EventType::CalloutRequest,
    "CALLOUT_RESPONSE" => EventType::CalloutResponse,
    "NAMED_CREDENTIAL_REQUEST" => EventType::NamedCredentialRequest,
    "NAMED_CREDENTIAL_RESPONSE" => EventType::NamedCredentialResponse,
    "USER_DEBUG" => EventType::UserDebug,
    "USER_INFO" => EventType::UserInfo,
    "EXCEPTION_THROWN" => EventType::ExceptionThrown,
    "FATAL_ERROR" => EventType::FatalError,
    "LIMIT_USAGE" => EventType::LimitUsage,
    "LIMIT_USAGE_FOR_NS" => EventType::LimitUsageForNs,
    "CUMULATIVE_LIMIT_USAGE" => EventType::CumulativeLimitUsage,
    "CUMULATIVE_LIMIT_USAGE_END" => EventType::CumulativeLimitUsageEnd,
    "CUMULATIVE_PROFILING" => EventType::CumulativeProfiling,
    "CUMULATIVE_PROFILING_BEGIN" => EventType::CumulativeProfilingBegin,
    "CUMULATIVE_PROFILING_END" => EventType::CumulativeProfilingEnd,
    "HEAP_ALLOCATE" => EventType::HeapAllocate,
    "HEAP_DEALLOCATE" => EventType::HeapDeallocate,
    "STATEMENT_EXECUTE" => EventType::StatementExecute,
    "VARIABLE_SCOPE_BEGIN" => EventType::VariableScopeBegin,
    "VARIABLE_SCOPE_END" => EventType::VariableScopeEnd,
    "VARIABLE_ASSIGNMENT" => EventType::VariableAssignment,
    "STATIC_VARIABLE_LIST" => EventType::StaticVariableList,
    "ENTERING_MANAGED_PKG" => EventType::EnteringManagedPkg,
    "FLOW_START_INTERVIEWS_BEGIN" => EventType::FlowStartInterviewsBegin,
    "FLOW_START_INTERVIEWS_END" => EventType::FlowStartInterviewsEnd,
    "FLOW_START_INTERVIEW_BEGIN" => EventType::FlowStartInterviewBegin,
    "FLOW_START_INTERVIEW_END" => EventType::FlowStartInterviewEnd,
    "FLOW_ELEMENT_BEGIN" => EventType::FlowElementBegin,
    "FLOW_ELEMENT_END" => EventType::FlowElementEnd,
    "FLOW_ELEMENT_ERROR" => EventType::FlowElementError,
    "FLOW_INTERVIEW_FINISHED" => EventType::FlowInterviewFinished,
    "WF_RULE_EVAL_BEGIN" => EventType::WfRuleEvalBegin,
    "WF_RULE_EVAL_END" => EventType::WfRuleEvalEnd,
    "WF_CRITERIA_BEGIN" => EventType::WfCriteriaBegin,
    "WF_CRITERIA_END" => EventType::WfCriteriaEnd,
    "WF_FIELD_UPDATE" => EventType::WfFieldUpdate,
    "VALIDATION_RULE" => EventType::ValidationRule,
    "VALIDATION_FORMULA" => EventType::ValidationFormula,
    "VALIDATION_PASS" => EventType::ValidationPass,
    "VALIDATION_FAIL" => EventType::ValidationFail,
    "VALIDATION_ERROR" => EventType::ValidationError,
    "QUERY_MORE_BEGIN" => EventType::QueryMoreBegin,
    "QUERY_MORE_END" => EventType::QueryMoreEnd,
    "QUERY_MORE_ITERATIONS" => EventType::QueryMoreIterations,
    "PUSH_TRACE_FLAGS" => EventType::PushTraceFlags,
    "POP_TRACE_FLAGS" => EventType::PopTraceFlags,
    "TESTING_LIMITS" => EventType::TestingLimits,
    "VF_APEX_CALL_START" => EventType::VfApexCallStart,
    "VF_APEX_CALL_END" => EventType::VfApexCallEnd,
    "VF_PAGE_MESSAGE" => EventType::VfPageMessage,
    "DUPLICATE_DETECTION_BEGIN" => EventType::DuplicateDetectionBegin,
    "DUPLICATE_DETECTION_END" => EventType::DuplicateDetectionEnd,
    "SAVEPOINT_SET" => EventType::SavepointSet,
    "SAVEPOINT_ROLLBACK" => EventType::SavepointRollback,
    "TOTAL_EMAIL_RECIPIENTS_QUEUED" => EventType::TotalEmailRecipientsQueued,
    "EMAIL_QUEUE" => EventType::EmailQueue,
    "NBA_NODE_BEGIN" => EventType::NbaNodeBegin,
    "NBA_NODE_END" => EventType::NbaNodeEnd,
};

/// Opening type → closing type for events that delimit a scope.
const SCOPE_PAIRS: &[(EventType, EventType)] = &[
    (EventType::CodeUnitStarted, EventType::CodeUnitFinished),
    (EventType::MethodEntry, EventType::MethodExit),
    (EventType::ConstructorEntry, EventType::ConstructorExit),
    (EventType::SystemMethodEntry, EventType::SystemMethodExit),
    (EventType::SystemConstructorEntry, EventType::SystemConstructorExit),
    (EventType::SystemModeEnter, EventType::SystemModeExit),
    (EventType::SoqlExecuteBegin, EventType::SoqlExecuteEnd),
    (EventType::SoslExecuteBegin, EventType::SoslExecuteEnd),
    (EventType::DmlBegin, EventType::DmlEnd),
    (EventType::CalloutRequest, EventType::CalloutResponse),
    (EventType::NamedCredentialRequest, EventType::NamedCredentialResponse),
    (EventType::CumulativeProfilingBegin, EventType::CumulativeProfilingEnd),
    (EventType::FlowStartInterviewsBegin, EventType::FlowStartInterviewsEnd),
    (EventType::FlowStartInterviewBegin, EventType::FlowStartInterviewEnd),
    (EventType::FlowElementBegin, EventType::FlowElementEnd),
    (EventType::WfRuleEvalBegin, EventType::WfRuleEvalEnd),
    (EventType::WfCriteriaBegin, EventType::WfCriteriaEnd),
    (EventType::QueryMoreBegin, EventType::QueryMoreEnd),
    (EventType::VfApexCallStart, EventType::VfApexCallEnd),
    (EventType::DuplicateDetectionBegin, EventType::DuplicateDetectionEnd),
    (EventType::NbaNodeBegin, EventType::NbaNodeEnd),
];

impl EventType {
    /// Canonicalise raw event-type text.
    ///
    /// Any bracketed suffix (`DML_BEGIN[EXTERNAL]`) is stripped before the
    /// lookup. Unrecognised text yields [`EventType::Unknown`].
    pub fn from_raw(raw: &str) -> EventType {
        let name = strip_bracketed_suffix(raw);
        KNOWN_TYPES.get(name).copied().unwrap_or(EventType::Unknown)
    }

    /// Canonical upper-snake text as it appears in the log.
    pub fn as_str(self) -> &'static str {
        match self {
            EventType::ExecutionStarted => "EXECUTION_STARTED",
            EventType::ExecutionFinished => "EXECUTION_FINISHED",
            EventType::CodeUnitStarted => "CODE_UNIT_STARTED",
            EventType::CodeUnitFinished => "CODE_UNIT_FINISHED",
            EventType::MethodEntry => "METHOD_ENTRY",
            EventType::MethodExit => "METHOD_EXIT",
            EventType::ConstructorEntry => "CONSTRUCTOR_ENTRY",
            EventType::ConstructorExit => "CONSTRUCTOR_EXIT",
            EventType::SystemMethodEntry => "SYSTEM_METHOD_ENTRY",
            EventType::SystemMethodExit => "SYSTEM_METHOD_EXIT",
            EventType::SystemConstructorEntry => "SYSTEM_CONSTRUCTOR_ENTRY",
            EventType::SystemConstructorExit => "SYSTEM_CONSTRUCTOR_EXIT",
            EventType::SystemModeEnter => "SYSTEM_MODE_ENTER",
            EventType::SystemModeExit => "SYSTEM_MODE_EXIT",
            EventType::SoqlExecuteBegin => "SOQL_EXECUTE_BEGIN",
            EventType::SoqlExecuteEnd => "SOQL_EXECUTE_END",
            EventType::SoqlExecuteExplain => "SOQL_EXECUTE_EXPLAIN",
            EventType::SoslExecuteBegin => "SOSL_EXECUTE_BEGIN",
            EventType::SoslExecuteEnd => "SOSL_EXECUTE_END",
            EventType::DmlBegin => "DML_BEGIN",
            EventType::DmlEnd => "DML_END",
            EventType::CalloutRequest => "CALLOUT_REQUEST",
            EventType::CalloutResponse => "CALLOUT_RESPONSE",
            EventType::NamedCredentialRequest => "NAMED_CREDENTIAL_REQUEST",
            EventType::NamedCredentialResponse => "NAMED_CREDENTIAL_RESPONSE",
            EventType::UserDebug => "USER_DEBUG",
            EventType::UserInfo => "USER_INFO",
            EventType::ExceptionThrown => "EXCEPTION_THROWN",
            EventType::FatalError => "FATAL_ERROR",
            EventType::LimitUsage => "LIMIT_USAGE",
            EventType::LimitUsageForNs => "LIMIT_USAGE_FOR_NS",
            EventType::CumulativeLimitUsage => "CUMULATIVE_LIMIT_USAGE",
            EventType::CumulativeLimitUsageEnd => "CUMULATIVE_LIMIT_USAGE_END",
            EventType::CumulativeProfiling => "CUMULATIVE_PROFILING",
            EventType::CumulativeProfilingBegin => "CUMULATIVE_PROFILING_BEGIN",
            EventType::CumulativeProfilingEnd => "CUMULATIVE_PROFILING_END",
            EventType::HeapAllocate => "HEAP_ALLOCATE",
            EventType::HeapDeallocate => "HEAP_DEALLOCATE",
            EventType::StatementExecute => "STATEMENT_EXECUTE",
            EventType::VariableScopeBegin => "VARIABLE_SCOPE_BEGIN",
            EventType::VariableScopeEnd => "VARIABLE_SCOPE_END",
            EventType::VariableAssignment => "VARIABLE_ASSIGNMENT",
            EventType::StaticVariableList => "STATIC_VARIABLE_LIST",
            EventType::EnteringManagedPkg => "ENTERING_MANAGED_PKG",
            EventType::FlowStartInterviewsBegin => "FLOW_START_INTERVIEWS_BEGIN",
            EventType::FlowStartInterviewsEnd => "FLOW_START_INTERVIEWS_END",
            EventType::FlowStartInterviewBegin => "FLOW_START_INTERVIEW_BEGIN",
            EventType::FlowStartInterviewEnd => "FLOW_START_INTERVIEW_END",
            EventType::FlowElementBegin => "FLOW_ELEMENT_BEGIN",
            EventType::FlowElementEnd => "FLOW_ELEMENT_END",
            EventType::FlowElementError => "FLOW_ELEMENT_ERROR",
            EventType::FlowInterviewFinished => "FLOW_INTERVIEW_FINISHED",
            EventType::WfRuleEvalBegin => "WF_RULE_EVAL_BEGIN",
            EventType::WfRuleEvalEnd => "WF_RULE_EVAL_END",
            EventType::WfCriteriaBegin => "WF_CRITERIA_BEGIN",
            EventType::WfCriteriaEnd => "WF_CRITERIA_END",
            EventType::WfFieldUpdate => "WF_FIELD_UPDATE",
            EventType::ValidationRule => "VALIDATION_RULE",
            EventType::ValidationFormula => "VALIDATION_FORMULA",
            EventType::ValidationPass => "VALIDATION_PASS",
            EventType::ValidationFail => "VALIDATION_FAIL",
            EventType::ValidationError => "VALIDATION_ERROR",
            EventType::QueryMoreBegin => "QUERY_MORE_BEGIN",
            EventType::QueryMoreEnd => "QUERY_MORE_END",
            EventType::QueryMoreIterations => "QUERY_MORE_ITERATIONS",
            EventType::PushTraceFlags => "PUSH_TRACE_FLAGS",
            EventType::PopTraceFlags => "POP_TRACE_FLAGS",
            EventType::TestingLimits => "TESTING_LIMITS",
            EventType::VfApexCallStart => "VF_APEX_CALL_START",
            EventType::VfApexCallEnd => "VF_APEX_CALL_END",
            EventType::VfPageMessage => "VF_PAGE_MESSAGE",
            EventType::DuplicateDetectionBegin => "DUPLICATE_DETECTION_BEGIN",
            EventType::DuplicateDetectionEnd => "DUPLICATE_DETECTION_END",
            EventType::SavepointSet => "SAVEPOINT_SET",
            EventType::SavepointRollback => "SAVEPOINT_ROLLBACK",
            EventType::TotalEmailRecipientsQueued => "TOTAL_EMAIL_RECIPIENTS_QUEUED",
            EventType::EmailQueue => "EMAIL_QUEUE",
            EventType::NbaNodeBegin => "NBA_NODE_BEGIN",
            EventType::NbaNodeEnd => "NBA_NODE_END",
            EventType::Unknown => "UNKNOWN",
        }
    }

    /// The type that closes (or opens) the scope this type opens (or closes).
    pub fn scope_partner(self) -> Option<EventType> {
        SCOPE_PAIRS.iter().find_map(|&(open, close)| {
            if open == self {
                Some(close)
            } else if close == self {
                Some(open)
            } else {
                None
            }
        })
    }

    /// `true` for entry/begin/start events that expect a matching exit.
    pub fn opens_scope(self) -> bool {
        SCOPE_PAIRS.iter().any(|&(open, _)| open == self)
    }

    /// `true` for exit/end/finish events that close a scope.
    pub fn closes_scope(self) -> bool {
        SCOPE_PAIRS.iter().any(|&(_, close)| close == self)
    }

    /// `true` for `FATAL_ERROR` and `EXCEPTION_THROWN`.
    pub fn is_exception(self) -> bool {
        matches!(self, EventType::ExceptionThrown | EventType::FatalError)
    }
}

impl std::fmt::Display for EventType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `true` when `raw` is a strict prefix of some known event-type name, i.e.
/// the text looks like a type name cut off mid-word.
pub fn is_known_prefix(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_uppercase() || b == b'_') {
        return false;
    }
    KNOWN_TYPES
        .keys()
        .any(|name| name.len() > raw.len() && name.starts_with(raw))
}

fn strip_bracketed_suffix(raw: &str) -> &str {
    match raw.find('[') {
        Some(idx) => raw[..idx].trim(),
        None => raw.trim(),
    }
}
